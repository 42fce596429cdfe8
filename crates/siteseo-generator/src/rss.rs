//! RSS feed generation.
//!
//! Generates an RSS 2.0 feed with an Atom `rel="self"` link for the blog.

use ::rss::{
    Category, ChannelBuilder, GuidBuilder, Item, ItemBuilder, extension::atom::AtomExtension,
};
use atom_syndication::LinkBuilder;
use chrono::{DateTime, Utc};
use siteseo_core::{BlogPost, Config, newest_first};
use tracing::debug;

use crate::RSS_FILE;

/// The `limit` most recent posts, newest first.
pub fn recent_posts(posts: &[BlogPost], limit: usize) -> Vec<&BlogPost> {
    let mut recent = newest_first(posts);
    recent.truncate(limit);
    recent
}

/// RSS feed generator.
#[derive(Debug, Clone)]
pub struct RssGenerator {
    config: Config,
}

impl RssGenerator {
    /// Create a new RSS generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate RSS feed XML from posts.
    pub fn generate(&self, posts: &[BlogPost], now: DateTime<Utc>) -> String {
        let limit = self.config.feed_limit();
        let posts = recent_posts(posts, limit);

        debug!(count = posts.len(), limit, "generating RSS feed");

        let items: Vec<Item> = posts.iter().map(|post| self.post_to_item(post)).collect();

        let mut channel = ChannelBuilder::default()
            .title(&self.config.site_name)
            .link(self.config.base_url())
            .description(
                self.config
                    .site_description
                    .as_deref()
                    .unwrap_or(&self.config.site_name),
            )
            .language(Some(self.config.language.clone()))
            .last_build_date(Some(now.to_rfc2822()))
            .items(items)
            .build();

        let self_link = LinkBuilder::default()
            .href(self.config.url_for(RSS_FILE))
            .rel("self".to_string())
            .mime_type(Some("application/rss+xml".to_string()))
            .build();
        let mut atom_ext = AtomExtension::default();
        atom_ext.set_links(vec![self_link]);
        channel.set_atom_ext(Some(atom_ext));

        channel.to_string()
    }

    /// Convert a post to an RSS item.
    fn post_to_item(&self, post: &BlogPost) -> Item {
        let url = self.config.url_for(&post.url_path());

        let guid = GuidBuilder::default().value(&url).permalink(true).build();

        let mut builder = ItemBuilder::default();
        builder.title(Some(post.title.clone()));
        builder.link(Some(url));
        builder.guid(Some(guid));
        builder.pub_date(Some(post.publish_date.to_rfc2822()));

        if !post.excerpt.is_empty() {
            builder.description(Some(post.excerpt.clone()));
        }

        let author = if post.author.is_empty() {
            self.config.author.clone()
        } else {
            Some(post.author.clone())
        };
        if let Some(author) = author {
            builder.author(Some(author));
        }

        let categories: Vec<_> = std::iter::once(&post.category)
            .chain(post.tags.iter())
            .filter(|name| !name.is_empty())
            .map(|name| Category {
                name: name.clone(),
                domain: None,
            })
            .collect();

        if !categories.is_empty() {
            builder.categories(categories);
        }

        builder.build()
    }
}
