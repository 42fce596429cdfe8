//! Robots.txt generation.
//!
//! Generates the robots.txt file for search engine crawlers.

use std::fmt::Write;

use siteseo_core::Config;
use tracing::debug;

use crate::sitemap::INDEX_FILE;

/// Robots.txt generator.
#[derive(Debug, Clone)]
pub struct RobotsGenerator {
    config: Config,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate robots.txt content.
    pub fn generate(&self) -> String {
        debug!("generating robots.txt");

        let mut out = String::from("User-agent: *\n");

        for path in &self.config.robots.allow {
            let _ = writeln!(out, "Allow: {path}");
        }

        for path in &self.config.robots.disallow {
            let _ = writeln!(out, "Disallow: {path}");
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Sitemap: {}", self.config.url_for(INDEX_FILE));

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_robots() {
        let generator = RobotsGenerator::new(Config::new("https://example.com"));

        let robots = generator.generate();

        assert_eq!(
            robots,
            "User-agent: *\nDisallow: /api/\nDisallow: /admin/\n\nSitemap: https://example.com/sitemap.xml\n"
        );
    }

    #[test]
    fn test_allow_rules_come_first() {
        let mut config = Config::new("https://example.com");
        config.robots.allow = vec!["/api/public/".to_string()];
        config.robots.disallow = vec!["/api/".to_string()];

        let robots = RobotsGenerator::new(config).generate();

        let allow = robots.find("Allow: /api/public/").unwrap();
        let disallow = robots.find("Disallow: /api/").unwrap();
        assert!(allow < disallow);
    }
}
