//! siteseo Generator Library
//!
//! SEO artifact generation for siteseo.
//!
//! # Modules
//!
//! - [`sitemap`] - XML sitemaps and the sitemap index
//! - [`rss`] - RSS 2.0 feed generation
//! - [`atom`] - Atom 1.0 feed generation
//! - [`robots`] - robots.txt generation
//! - [`writer`] - Artifact writing with gzip companions
//! - [`build`] - Build orchestration

pub mod atom;
pub mod build;
pub mod robots;
pub mod rss;
pub mod sitemap;
pub mod writer;

pub use atom::AtomGenerator;
pub use build::{BuildError, BuildStats, Builder};
pub use robots::RobotsGenerator;
pub use self::rss::RssGenerator;
pub use sitemap::{ChangeFreq, SitemapGenerator, SitemapUrl};
pub use writer::{ArtifactWriter, WriteError};

/// File name of the RSS feed.
pub const RSS_FILE: &str = "rss.xml";

/// File name of the Atom feed.
pub const ATOM_FILE: &str = "atom.xml";

/// File name of robots.txt.
pub const ROBOTS_FILE: &str = "robots.txt";

/// Every artifact a build writes (each also gets a `.gz` sibling).
pub const ARTIFACTS: [&str; 9] = [
    sitemap::INDEX_FILE,
    sitemap::PAGES_FILE,
    sitemap::POSTS_FILE,
    sitemap::CATEGORIES_FILE,
    sitemap::TAGS_FILE,
    sitemap::APPS_FILE,
    ROBOTS_FILE,
    RSS_FILE,
    ATOM_FILE,
];
