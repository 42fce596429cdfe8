//! Content store: blog posts and site descriptions read from JSON documents.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::error::{CoreError, Result};

/// File name of the blog post document inside the content directory.
pub const POSTS_FILE: &str = "blog-posts.json";

/// File name of the site description document inside the content directory.
pub const SITE_FILE: &str = "site.json";

/// A blog post as stored in the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Post identifier; numeric ids are kept in their decimal form.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Post title.
    pub title: String,

    /// Unique, URL-safe slug.
    pub slug: String,

    /// Short summary.
    #[serde(default)]
    pub excerpt: String,

    /// Long-form markup.
    #[serde(default)]
    pub content: String,

    /// Editorial category.
    #[serde(default)]
    pub category: String,

    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Publication timestamp.
    #[serde(with = "flexible_date")]
    pub publish_date: DateTime<Utc>,

    /// Last update timestamp.
    #[serde(default, with = "flexible_date::option")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Author display name.
    #[serde(default)]
    pub author: String,

    /// Whether the post is promoted.
    #[serde(default)]
    pub featured: bool,

    /// Estimated reading time in minutes.
    #[serde(default)]
    pub reading_time: u32,
}

impl BlogPost {
    /// Site-relative URL path of the post.
    pub fn url_path(&self) -> String {
        format!("/blog/{}", self.slug)
    }

    /// `updatedAt`, falling back to `publishDate`.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.publish_date)
    }
}

/// An app showcased on the apps page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    /// Display name; the sitemap anchor is derived from it.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// External store or product URL.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub platforms: Vec<String>,
}

impl App {
    /// Anchor slug used on the apps page.
    pub fn anchor(&self) -> String {
        slugify(&self.name)
    }
}

/// IT services catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCatalog {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub categories: Vec<ServiceCategory>,
}

/// A group of related services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCategory {
    pub title: String,

    #[serde(default)]
    pub services: Vec<Service>,
}

/// A single service offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Call-to-action link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaLink {
    pub label: String,
    pub href: String,
}

/// Site-wide descriptive content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteEntry {
    /// Apps listed on the apps page.
    #[serde(default)]
    pub apps: Vec<App>,

    /// IT services catalog.
    #[serde(default)]
    pub it_services: ServiceCatalog,

    /// Call-to-action links.
    #[serde(default)]
    pub ctas: Vec<CtaLink>,
}

/// Accepts either a bare array of posts or `{ "posts": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PostsDocument {
    List(Vec<BlogPost>),
    Wrapped { posts: Vec<BlogPost> },
}

impl From<PostsDocument> for Vec<BlogPost> {
    fn from(doc: PostsDocument) -> Self {
        match doc {
            PostsDocument::List(posts) | PostsDocument::Wrapped { posts } => posts,
        }
    }
}

/// Everything the generators read during one run.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    /// All blog posts, in document order.
    pub posts: Vec<BlogPost>,

    /// Site descriptions.
    pub site: SiteEntry,
}

impl ContentStore {
    /// Create a store from already loaded records.
    pub fn new(posts: Vec<BlogPost>, site: SiteEntry) -> Self {
        Self { posts, site }
    }

    /// Load both documents from `content_dir`, failing on the first error.
    pub fn load(content_dir: &Path) -> Result<Self> {
        info!(dir = %content_dir.display(), "loading content store");

        let posts = load_posts(&content_dir.join(POSTS_FILE))?;
        let site = load_site(&content_dir.join(SITE_FILE))?;

        Ok(Self { posts, site })
    }

    /// Load both documents from `content_dir`, substituting empty collections
    /// for any document that is missing or malformed.
    pub fn load_lenient(content_dir: &Path) -> Self {
        info!(dir = %content_dir.display(), "loading content store");

        let posts = load_posts(&content_dir.join(POSTS_FILE)).unwrap_or_else(|e| {
            warn!(error = %e, "failed to load blog posts, continuing with none");
            Vec::new()
        });

        let site = load_site(&content_dir.join(SITE_FILE)).unwrap_or_else(|e| {
            warn!(error = %e, "failed to load site content, continuing with none");
            SiteEntry::default()
        });

        Self { posts, site }
    }

    /// Look up a post by slug.
    pub fn post(&self, slug: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Posts sorted by publication date, newest first.
    ///
    /// Ties are broken by slug so the order is stable across runs.
    pub fn posts_by_date(&self) -> Vec<&BlogPost> {
        newest_first(&self.posts)
    }

    /// Posts whose last modification falls within `days` before `now`.
    ///
    /// A negative window counts as zero; a window reaching past the earliest
    /// representable date covers every post up to `now`.
    pub fn changed_since(&self, now: DateTime<Utc>, days: i64) -> Vec<&BlogPost> {
        let cutoff = TimeDelta::try_days(days.max(0))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.posts_by_date()
            .into_iter()
            .filter(|p| {
                let modified = p.last_modified();
                modified >= cutoff && modified <= now
            })
            .collect()
    }
}

/// `posts` sorted by publication date, newest first, ties broken by slug.
pub fn newest_first(posts: &[BlogPost]) -> Vec<&BlogPost> {
    let mut sorted: Vec<_> = posts.iter().collect();
    sorted.sort_by(|a, b| {
        b.publish_date
            .cmp(&a.publish_date)
            .then_with(|| a.slug.cmp(&b.slug))
    });
    sorted
}

/// Read the blog post document.
pub fn load_posts(path: &Path) -> Result<Vec<BlogPost>> {
    let raw = read_document(path)?;
    let doc: PostsDocument = serde_json::from_str(&raw)
        .map_err(|e| CoreError::content(path, e.to_string()))?;
    let posts: Vec<BlogPost> = doc.into();

    let mut seen = HashSet::new();
    for post in &posts {
        if !seen.insert(post.slug.as_str()) {
            warn!(slug = %post.slug, "duplicate blog post slug");
        }
    }

    debug!(count = posts.len(), path = %path.display(), "loaded blog posts");
    Ok(posts)
}

/// Read the site description document.
pub fn load_site(path: &Path) -> Result<SiteEntry> {
    let raw = read_document(path)?;
    let site: SiteEntry =
        serde_json::from_str(&raw).map_err(|e| CoreError::content(path, e.to_string()))?;

    debug!(apps = site.apps.len(), path = %path.display(), "loaded site content");
    Ok(site)
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| CoreError::content(PathBuf::from(path), e.to_string()))
}

/// Lowercase `input` and join its alphanumeric runs with hyphens.
///
/// `"Task Master Pro"` becomes `"task-master-pro"`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s,
    })
}

/// Dates written either as RFC 3339 timestamps or as plain `YYYY-MM-DD`.
mod flexible_date {
    use super::*;

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub(super) fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }

    pub(super) mod option {
        use super::*;

        pub(in super::super) fn serialize<S>(
            date: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(date) => serializer.serialize_some(&date.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub(in super::super) fn deserialize<'de, D>(
            deserializer: D,
        ) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.is_empty() => Ok(None),
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}"))),
            }
        }
    }
}
