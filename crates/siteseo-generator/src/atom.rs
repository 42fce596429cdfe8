//! Atom 1.0 feed generation.

use atom_syndication::{
    CategoryBuilder, ContentBuilder, Entry, EntryBuilder, Feed, FeedBuilder, GeneratorBuilder,
    Link, LinkBuilder, Person, PersonBuilder, Text,
};
use chrono::{DateTime, Utc};
use siteseo_core::{BlogPost, Config};
use tracing::debug;

use crate::{ATOM_FILE, rss::recent_posts};

/// Atom feed generator.
#[derive(Debug, Clone)]
pub struct AtomGenerator {
    config: Config,
}

impl AtomGenerator {
    /// Create a new Atom generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate Atom feed XML from posts.
    pub fn generate(&self, posts: &[BlogPost], now: DateTime<Utc>) -> String {
        let limit = self.config.feed_limit();
        let posts = recent_posts(posts, limit);

        debug!(count = posts.len(), limit, "generating Atom feed");

        let entries: Vec<Entry> = posts.iter().map(|post| self.post_to_entry(post)).collect();

        let self_link: Link = LinkBuilder::default()
            .href(self.config.url_for(ATOM_FILE))
            .rel("self".to_string())
            .mime_type(Some("application/atom+xml".to_string()))
            .build();

        let alternate_link: Link = LinkBuilder::default()
            .href(self.config.base_url().to_string())
            .rel("alternate".to_string())
            .build();

        let authors: Vec<Person> = self
            .config
            .author
            .iter()
            .map(|name| PersonBuilder::default().name(name.clone()).build())
            .collect();

        let feed: Feed = FeedBuilder::default()
            .title(Text::plain(self.config.site_name.clone()))
            .id(self.config.base_url().to_string())
            .updated(now.fixed_offset())
            .authors(authors)
            .links(vec![self_link, alternate_link])
            .subtitle(
                self.config
                    .site_description
                    .as_ref()
                    .map(|d| Text::plain(d.clone())),
            )
            .generator(Some(GeneratorBuilder::default().value("siteseo").build()))
            .lang(Some(self.config.language.clone()))
            .entries(entries)
            .build();

        feed.to_string()
    }

    fn post_to_entry(&self, post: &BlogPost) -> Entry {
        let url = self.config.url_for(&post.url_path());

        let link: Link = LinkBuilder::default()
            .href(url.clone())
            .rel("alternate".to_string())
            .mime_type(Some("text/html".to_string()))
            .build();

        let author = if post.author.is_empty() {
            self.config.author.clone()
        } else {
            Some(post.author.clone())
        };
        let authors: Vec<Person> = author
            .into_iter()
            .map(|name| PersonBuilder::default().name(name).build())
            .collect();

        let categories: Vec<_> = std::iter::once(&post.category)
            .chain(post.tags.iter())
            .filter(|term| !term.is_empty())
            .map(|term| CategoryBuilder::default().term(term.clone()).build())
            .collect();

        let summary = (!post.excerpt.is_empty()).then(|| Text::html(post.excerpt.clone()));
        let content = (!post.content.is_empty()).then(|| {
            ContentBuilder::default()
                .value(Some(post.content.clone()))
                .content_type(Some("html".to_string()))
                .build()
        });

        EntryBuilder::default()
            .title(Text::plain(post.title.clone()))
            .id(url)
            .links(vec![link])
            .updated(post.last_modified().fixed_offset())
            .published(Some(post.publish_date.fixed_offset()))
            .authors(authors)
            .categories(categories)
            .summary(summary)
            .content(content)
            .build()
    }
}
