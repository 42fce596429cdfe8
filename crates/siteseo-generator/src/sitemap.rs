//! Sitemap generation.
//!
//! Generates the sitemaps.org `<urlset>` documents for pages, posts,
//! categories, tags and apps, plus the `<sitemapindex>` that ties them
//! together. Every generator takes the generation timestamp as an argument so
//! output is reproducible under a frozen clock.

use chrono::{DateTime, SecondsFormat, Utc};
pub use siteseo_core::routes::{ChangeFreq, STATIC_ROUTES, StaticRoute};
use siteseo_core::{App, BlogPost, Config, slugify};
use tracing::debug;

/// Sitemap index file name.
pub const INDEX_FILE: &str = "sitemap.xml";
/// Static pages sitemap file name.
pub const PAGES_FILE: &str = "sitemap-pages.xml";
/// Blog posts sitemap file name.
pub const POSTS_FILE: &str = "sitemap-posts.xml";
/// Categories sitemap file name.
pub const CATEGORIES_FILE: &str = "sitemap-categories.xml";
/// Tags sitemap file name.
pub const TAGS_FILE: &str = "sitemap-tags.xml";
/// Apps sitemap file name.
pub const APPS_FILE: &str = "sitemap-apps.xml";

/// Sub-sitemaps listed by the index, in index order.
pub const SUB_SITEMAPS: [&str; 5] = [PAGES_FILE, POSTS_FILE, CATEGORIES_FILE, TAGS_FILE, APPS_FILE];

const XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    /// Absolute URL.
    pub loc: String,

    /// Last modification timestamp.
    pub lastmod: DateTime<Utc>,

    /// Change frequency.
    pub changefreq: ChangeFreq,

    /// Priority, always within 0.0..=1.0.
    pub priority: f32,
}

impl SitemapUrl {
    /// Create an entry, clamping `priority` into 0.0..=1.0.
    pub fn new(
        loc: impl Into<String>,
        lastmod: DateTime<Utc>,
        changefreq: ChangeFreq,
        priority: f32,
    ) -> Self {
        let priority = if priority.is_nan() {
            0.5
        } else {
            priority.clamp(0.0, 1.0)
        };

        Self {
            loc: loc.into(),
            lastmod,
            changefreq,
            priority,
        }
    }
}

/// Sitemap generator.
#[derive(Debug, Clone)]
pub struct SitemapGenerator {
    config: Config,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Sitemap of the static routes in [`STATIC_ROUTES`].
    pub fn pages(&self, now: DateTime<Utc>) -> String {
        let urls: Vec<_> = STATIC_ROUTES
            .iter()
            .map(|route| {
                SitemapUrl::new(
                    self.config.url_for(route.path),
                    now,
                    route.changefreq,
                    route.priority,
                )
            })
            .collect();

        debug!(count = urls.len(), "generating pages sitemap");
        urlset(&urls)
    }

    /// Sitemap with one entry per blog post.
    pub fn posts(&self, posts: &[BlogPost]) -> String {
        let urls: Vec<_> = posts
            .iter()
            .filter_map(|post| self.post_to_url(post))
            .collect();

        debug!(count = urls.len(), "generating posts sitemap");
        urlset(&urls)
    }

    /// Sitemap of the configured category vocabulary.
    pub fn categories(&self, now: DateTime<Utc>) -> String {
        let urls =
            self.taxonomy_urls(&self.config.taxonomies.categories, "category", now, 0.5);

        debug!(count = urls.len(), "generating categories sitemap");
        urlset(&urls)
    }

    /// Sitemap of the configured tag vocabulary.
    pub fn tags(&self, now: DateTime<Utc>) -> String {
        let urls = self.taxonomy_urls(&self.config.taxonomies.tags, "tag", now, 0.4);

        debug!(count = urls.len(), "generating tags sitemap");
        urlset(&urls)
    }

    /// Sitemap with one anchored apps-page entry per app.
    pub fn apps(&self, apps: &[App], now: DateTime<Utc>) -> String {
        let urls: Vec<_> = apps
            .iter()
            .map(|app| {
                let loc = format!("{}#{}", self.config.url_for("/apps"), app.anchor());
                SitemapUrl::new(loc, now, ChangeFreq::Monthly, 0.7)
            })
            .collect();

        debug!(count = urls.len(), "generating apps sitemap");
        urlset(&urls)
    }

    /// Sitemap index listing [`SUB_SITEMAPS`].
    ///
    /// The sub-sitemaps themselves are not inspected.
    pub fn index(&self, now: DateTime<Utc>) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<sitemapindex xmlns="{XMLNS}">"#));
        xml.push('\n');

        let lastmod = format_lastmod(&now);

        for sitemap in SUB_SITEMAPS {
            xml.push_str("  <sitemap>\n");
            xml.push_str(&format!(
                "    <loc>{}</loc>\n",
                escape_xml(&self.config.url_for(sitemap))
            ));
            xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            xml.push_str("  </sitemap>\n");
        }

        xml.push_str("</sitemapindex>\n");
        xml
    }

    /// Convert a post to a sitemap URL entry.
    fn post_to_url(&self, post: &BlogPost) -> Option<SitemapUrl> {
        if post.slug.is_empty() {
            debug!(id = %post.id, "skipping post without slug");
            return None;
        }

        let priority = if post.featured { 0.8 } else { 0.6 };

        Some(SitemapUrl::new(
            self.config.url_for(&post.url_path()),
            post.last_modified(),
            ChangeFreq::Monthly,
            priority,
        ))
    }

    fn taxonomy_urls(
        &self,
        terms: &[String],
        segment: &str,
        now: DateTime<Utc>,
        priority: f32,
    ) -> Vec<SitemapUrl> {
        terms
            .iter()
            .map(|term| slugify(term))
            .filter(|slug| !slug.is_empty())
            .map(|slug| {
                SitemapUrl::new(
                    self.config.url_for(&format!("/blog/{segment}/{slug}")),
                    now,
                    ChangeFreq::Weekly,
                    priority,
                )
            })
            .collect()
    }
}

/// Render a `<urlset>` document.
pub fn urlset(urls: &[SitemapUrl]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{XMLNS}">"#));
    xml.push('\n');

    for url in urls {
        xml.push_str(&url_to_xml(url));
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Convert a URL entry to XML.
fn url_to_xml(url: &SitemapUrl) -> String {
    let mut xml = String::from("  <url>\n");

    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url.loc)));
    xml.push_str(&format!(
        "    <lastmod>{}</lastmod>\n",
        format_lastmod(&url.lastmod)
    ));
    xml.push_str(&format!(
        "    <changefreq>{}</changefreq>\n",
        url.changefreq.as_str()
    ));
    xml.push_str(&format!("    <priority>{:.1}</priority>\n", url.priority));

    xml.push_str("  </url>\n");
    xml
}

fn format_lastmod(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn test_config() -> Config {
        Config::new("https://example.com")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn test_post(slug: &str, featured: bool) -> BlogPost {
        BlogPost {
            id: slug.to_string(),
            title: slug.to_string(),
            slug: slug.to_string(),
            excerpt: String::new(),
            content: String::new(),
            category: "Technology".to_string(),
            tags: vec![],
            publish_date: Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap(),
            updated_at: None,
            author: "Jane".to_string(),
            featured,
            reading_time: 3,
        }
    }

    #[test]
    fn test_posts_sitemap() {
        let generator = SitemapGenerator::new(test_config());
        let posts = vec![test_post("first", true), test_post("second", false)];

        let xml = generator.posts(&posts);

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<loc>https://example.com/blog/first</loc>"));
        assert!(xml.contains("<loc>https://example.com/blog/second</loc>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert!(xml.contains("<priority>0.6</priority>"));
        assert!(xml.contains("<changefreq>monthly</changefreq>"));
        assert!(xml.contains("<lastmod>2025-01-10T00:00:00Z</lastmod>"));
    }

    #[test]
    fn test_post_lastmod_prefers_updated_at() {
        let generator = SitemapGenerator::new(test_config());
        let mut post = test_post("edited", false);
        post.updated_at = Some(Utc.with_ymd_and_hms(2025, 3, 2, 8, 30, 0).unwrap());

        let url = generator.post_to_url(&post).unwrap();
        assert_eq!(url.lastmod, post.updated_at.unwrap());
    }

    #[test]
    fn test_post_without_slug_is_skipped() {
        let generator = SitemapGenerator::new(test_config());
        let posts = vec![test_post("", false), test_post("kept", false)];

        let xml = generator.posts(&posts);
        assert_eq!(xml.matches("<url>").count(), 1);
    }

    #[test]
    fn test_pages_sitemap_lists_static_routes() {
        let generator = SitemapGenerator::new(test_config());
        let xml = generator.pages(now());

        assert_eq!(xml.matches("<url>").count(), STATIC_ROUTES.len());
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<loc>https://example.com/it-services</loc>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<lastmod>2025-06-01T12:00:00Z</lastmod>"));
    }

    #[test]
    fn test_taxonomy_sitemaps_use_static_vocabulary() {
        let mut config = test_config();
        config.taxonomies.categories = vec!["Case Studies".to_string()];
        config.taxonomies.tags = vec!["web-development".to_string(), "  ".to_string()];
        let generator = SitemapGenerator::new(config);

        let categories = generator.categories(now());
        assert_eq!(categories.matches("<url>").count(), 1);
        assert!(categories.contains("<loc>https://example.com/blog/category/case-studies</loc>"));

        let tags = generator.tags(now());
        assert_eq!(tags.matches("<url>").count(), 1);
        assert!(tags.contains("<loc>https://example.com/blog/tag/web-development</loc>"));
    }

    #[test]
    fn test_apps_sitemap_anchors() {
        let generator = SitemapGenerator::new(test_config());
        let apps = vec![App {
            name: "Task Master Pro".to_string(),
            description: None,
            url: None,
            platforms: vec![],
        }];

        let xml = generator.apps(&apps, now());
        assert!(xml.contains("<loc>https://example.com/apps#task-master-pro</loc>"));
    }

    #[test]
    fn test_generate_index() {
        let generator = SitemapGenerator::new(test_config());

        let xml = generator.index(now());

        assert!(xml.contains("<sitemapindex"));
        assert_eq!(xml.matches("<sitemap>").count(), SUB_SITEMAPS.len());
        for name in SUB_SITEMAPS {
            assert!(xml.contains(&format!("<loc>https://example.com/{name}</loc>")));
        }
        assert!(xml.contains("<lastmod>2025-06-01T12:00:00Z</lastmod>"));
    }

    #[test]
    fn test_priority_is_clamped() {
        assert_eq!(SitemapUrl::new("a", now(), ChangeFreq::Daily, 1.7).priority, 1.0);
        assert_eq!(SitemapUrl::new("a", now(), ChangeFreq::Daily, -0.2).priority, 0.0);
        assert_eq!(SitemapUrl::new("a", now(), ChangeFreq::Daily, f32::NAN).priority, 0.5);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
    }
}
