//! Site configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for siteseo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Absolute site origin (e.g., "https://example.com").
    pub site_url: String,

    /// Site name used as the feed title.
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Site description for feed channels.
    #[serde(default)]
    pub site_description: Option<String>,

    /// Language code advertised by the feeds.
    #[serde(default = "default_language")]
    pub language: String,

    /// Fallback author for feed entries without one.
    #[serde(default)]
    pub author: Option<String>,

    /// Feed settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// robots.txt settings.
    #[serde(default)]
    pub robots: RobotsConfig,

    /// Category and tag vocabularies for the taxonomy sitemaps.
    #[serde(default)]
    pub taxonomies: TaxonomyConfig,

    /// IndexNow notification settings.
    #[serde(default)]
    pub index_now: IndexNowConfig,

    /// Changed-URL tracking used by the "ping changed" flow.
    #[serde(default)]
    pub changes: ChangesConfig,
}

/// RSS/Atom feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedConfig {
    /// Maximum number of entries per feed (never more than [`MAX_FEED_ITEMS`]).
    #[serde(default = "default_feed_limit")]
    pub limit: usize,
}

/// Hard cap on feed entries.
pub const MAX_FEED_ITEMS: usize = 50;

/// robots.txt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotsConfig {
    /// Paths disallowed for all crawlers.
    #[serde(default = "default_disallow")]
    pub disallow: Vec<String>,

    /// Paths explicitly allowed.
    #[serde(default)]
    pub allow: Vec<String>,
}

/// Static taxonomy vocabularies.
///
/// These lists are not scanned from post data: a category or tag used by a
/// post but missing here never reaches its sitemap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyConfig {
    /// Blog categories.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Blog tags.
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
}

/// IndexNow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexNowConfig {
    /// Whether notifications are sent at all.
    #[serde(default)]
    pub enabled: bool,

    /// Key shared with the search engines.
    #[serde(default)]
    pub key: String,

    /// Notification endpoints.
    #[serde(default = "default_engines")]
    pub engines: Vec<String>,

    /// Override for the key-verification file URL.
    #[serde(default)]
    pub key_location: Option<String>,
}

/// Upper bound for `changes.windowDays`.
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Changed-URL tracking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangesConfig {
    /// Posts updated within this many days of a build count as changed.
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    /// File name (relative to the output directory) of the changed-URL list.
    #[serde(default = "default_changes_file")]
    pub file: String,
}

// Default value functions
fn default_site_name() -> String {
    "Website".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_feed_limit() -> usize {
    MAX_FEED_ITEMS
}

fn default_disallow() -> Vec<String> {
    vec!["/api/".to_string(), "/admin/".to_string()]
}

fn default_categories() -> Vec<String> {
    [
        "Technology",
        "Business",
        "Development",
        "Design",
        "Marketing",
        "Case Studies",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_tags() -> Vec<String> {
    [
        "react",
        "javascript",
        "web-development",
        "mobile-apps",
        "seo",
        "cloud",
        "ai",
        "cybersecurity",
        "ui-ux",
        "startups",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_engines() -> Vec<String> {
    vec![
        "https://api.indexnow.org/indexnow".to_string(),
        "https://www.bing.com/indexnow".to_string(),
        "https://yandex.com/indexnow".to_string(),
    ]
}

fn default_window_days() -> i64 {
    7
}

fn default_changes_file() -> String {
    "indexnow-changes.json".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            limit: default_feed_limit(),
        }
    }
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            disallow: default_disallow(),
            allow: Vec::new(),
        }
    }
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            tags: default_tags(),
        }
    }
}

impl Default for IndexNowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            key: String::new(),
            engines: default_engines(),
            key_location: None,
        }
    }
}

impl Default for ChangesConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            file: default_changes_file(),
        }
    }
}

impl Config {
    /// Build a configuration for `site_url` with every other setting defaulted.
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            site_name: default_site_name(),
            site_description: None,
            language: default_language(),
            author: None,
            feed: FeedConfig::default(),
            robots: RobotsConfig::default(),
            taxonomies: TaxonomyConfig::default(),
            index_now: IndexNowConfig::default(),
            changes: ChangesConfig::default(),
        }
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, layering `SITESEO__*`
    /// environment variables over the file.
    ///
    /// Variable names are snake case with `__` between nesting levels, e.g.
    /// `SITESEO__SITE_NAME` or `SITESEO__INDEX_NOW__ENABLED`.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("SITESEO")
                    .separator("__")
                    .convert_case(config::Case::Camel)
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site_url.is_empty() {
            return Err(CoreError::config("siteUrl cannot be empty"));
        }

        if !self.site_url.starts_with("http://") && !self.site_url.starts_with("https://") {
            return Err(CoreError::config(
                "siteUrl must be an absolute http(s) origin",
            ));
        }

        if self.site_url.ends_with('/') {
            tracing::warn!("siteUrl should not have a trailing slash");
        }

        if self.feed.limit == 0 {
            return Err(CoreError::config("feed.limit must be at least 1"));
        }

        if self.index_now.enabled {
            if self.index_now.key.is_empty() {
                return Err(CoreError::config(
                    "indexNow.key cannot be empty when indexNow is enabled",
                ));
            }

            if self.index_now.engines.is_empty() {
                return Err(CoreError::config(
                    "indexNow.engines cannot be empty when indexNow is enabled",
                ));
            }
        }

        if !self.index_now.key.is_empty() {
            self.index_now.validate_key()?;
        }

        if !(1..=MAX_WINDOW_DAYS).contains(&self.changes.window_days) {
            return Err(CoreError::config(format!(
                "changes.windowDays must be between 1 and {MAX_WINDOW_DAYS}"
            )));
        }

        Ok(())
    }

    /// Site origin without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url();
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Effective feed limit, never above [`MAX_FEED_ITEMS`].
    pub fn feed_limit(&self) -> usize {
        self.feed.limit.min(MAX_FEED_ITEMS)
    }

    /// URL of the IndexNow key-verification file.
    pub fn key_location(&self) -> String {
        self.index_now
            .key_location
            .clone()
            .unwrap_or_else(|| self.url_for(&format!("{}.txt", self.index_now.key)))
    }
}

impl IndexNowConfig {
    /// Check the key format: 8 to 128 characters of `a-z`, `A-Z`, `0-9` and `-`.
    pub fn validate_key(&self) -> Result<()> {
        let valid_len = (8..=128).contains(&self.key.len());
        let valid_chars = self
            .key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');

        if !valid_len || !valid_chars {
            return Err(CoreError::config(
                "indexNow.key must be 8-128 characters of letters, digits or '-'",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"{
  "siteUrl": "https://example.com",
  "siteName": "Example Co",
  "siteDescription": "Software and IT services",
  "author": "Example Team",
  "feed": { "limit": 20 },
  "robots": { "disallow": ["/private/"] },
  "taxonomies": { "categories": ["News"], "tags": ["rust"] },
  "indexNow": {
    "enabled": true,
    "key": "0123456789abcdef",
    "engines": ["https://api.indexnow.org/indexnow"]
  },
  "changes": { "windowDays": 3 }
}"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("config.json");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site_url, "https://example.com");
        assert_eq!(config.site_name, "Example Co");
        assert_eq!(
            config.site_description.as_deref(),
            Some("Software and IT services")
        );
        assert_eq!(config.feed.limit, 20);
        assert_eq!(config.robots.disallow, vec!["/private/"]);
        assert_eq!(config.taxonomies.categories, vec!["News"]);
        assert_eq!(config.taxonomies.tags, vec!["rust"]);
        assert!(config.index_now.enabled);
        assert_eq!(config.index_now.key, "0123456789abcdef");
        assert_eq!(config.index_now.engines.len(), 1);
        assert_eq!(config.changes.window_days, 3);
        assert_eq!(config.changes.file, "indexnow-changes.json");
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{ "siteUrl": "https://example.com" }"#).expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.language, "en");
        assert_eq!(config.feed.limit, MAX_FEED_ITEMS);
        assert_eq!(config.robots.disallow, vec!["/api/", "/admin/"]);
        assert!(!config.taxonomies.categories.is_empty());
        assert!(!config.index_now.enabled);
        assert_eq!(config.index_now.engines.len(), 3);
        assert_eq!(config.changes.window_days, 7);
    }

    #[test]
    fn test_url_for() {
        let config = Config::new("https://example.com/");

        assert_eq!(config.url_for("/blog/hello"), "https://example.com/blog/hello");
        assert_eq!(config.url_for("blog/hello"), "https://example.com/blog/hello");
        assert_eq!(config.url_for("/"), "https://example.com/");
    }

    #[test]
    fn test_feed_limit_is_capped() {
        let mut config = Config::new("https://example.com");
        config.feed.limit = 500;
        assert_eq!(config.feed_limit(), MAX_FEED_ITEMS);

        config.feed.limit = 10;
        assert_eq!(config.feed_limit(), 10);
    }

    #[test]
    fn test_key_location() {
        let mut config = Config::new("https://example.com");
        config.index_now.key = "abcdef123456".to_string();
        assert_eq!(config.key_location(), "https://example.com/abcdef123456.txt");

        config.index_now.key_location = Some("https://cdn.example.com/key.txt".to_string());
        assert_eq!(config.key_location(), "https://cdn.example.com/key.txt");
    }

    #[test]
    fn test_config_validation_empty_site_url() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{ "siteUrl": "" }"#).expect("write");

        let result = Config::load(&config_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("siteUrl cannot be empty")
        );
    }

    #[test]
    fn test_config_validation_relative_site_url() {
        let config = Config::new("example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_index_now_key() {
        let mut config = Config::new("https://example.com");
        config.index_now.enabled = true;
        assert!(config.validate().is_err());

        config.index_now.key = "short".to_string();
        assert!(config.validate().is_err());

        config.index_now.key = "has spaces in it".to_string();
        assert!(config.validate().is_err());

        config.index_now.key = "a1b2c3d4-e5f6".to_string();
        assert!(config.validate().is_ok());

        config.index_now.engines.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_key_checked_even_when_disabled() {
        let mut config = Config::new("https://example.com");
        config.index_now.key = "../../etc/passwd".to_string();
        assert!(config.validate().is_err());

        config.index_now.key = String::new();
        assert!(config.validate().is_ok());

        config.index_now.key = "abcdef0123456789".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_window_days_bounds() {
        let mut config = Config::new("https://example.com");

        config.changes.window_days = 0;
        assert!(config.validate().is_err());

        config.changes.window_days = -3;
        assert!(config.validate().is_err());

        config.changes.window_days = MAX_WINDOW_DAYS + 1;
        assert!(config.validate().is_err());

        config.changes.window_days = MAX_WINDOW_DAYS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_with_env_overrides() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("siteseo.json");
        std::fs::write(&config_path, create_test_config()).expect("write");

        // SAFETY: no other test reads or writes SITESEO__* variables.
        unsafe {
            std::env::set_var("SITESEO__SITE_NAME", "From Env");
            std::env::set_var("SITESEO__CHANGES__WINDOW_DAYS", "14");
        }
        let result = Config::load_with_env(&config_path);
        unsafe {
            std::env::remove_var("SITESEO__SITE_NAME");
            std::env::remove_var("SITESEO__CHANGES__WINDOW_DAYS");
        }

        let config = result.expect("load config");
        assert_eq!(config.site_name, "From Env");
        assert_eq!(config.changes.window_days, 14);
        assert_eq!(config.site_url, "https://example.com");
        assert_eq!(config.index_now.key, "0123456789abcdef");
        assert_eq!(config.taxonomies.tags, vec!["rust"]);
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/config.json"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_config_malformed() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "{ siteUrl: ").expect("write");

        let result = Config::load(&config_path);
        assert!(result.unwrap_err().to_string().contains("Failed to parse"));
    }
}
