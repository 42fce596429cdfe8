//! Build orchestration.
//!
//! Coordinates loading the content store and writing every artifact.

use std::{path::PathBuf, time::Instant};

use chrono::{DateTime, Utc};
use siteseo_core::{Config, ContentStore};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    ATOM_FILE, RSS_FILE, ROBOTS_FILE,
    atom::AtomGenerator,
    robots::RobotsGenerator,
    rss::RssGenerator,
    sitemap::{self, SitemapGenerator},
    writer::{ArtifactWriter, WriteError},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Artifact could not be written.
    #[error("write error: {0}")]
    Write(#[from] WriteError),

    /// Changed-URL list could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of blog posts in the content store.
    pub posts: usize,

    /// Number of apps in the content store.
    pub apps: usize,

    /// Number of gzip-companioned artifacts written.
    pub artifacts: usize,

    /// Number of posts listed as recently changed.
    pub changed: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(
        config: Config,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Execute the build against the current wall clock.
    pub fn build(&self) -> Result<BuildStats> {
        self.build_at(Utc::now())
    }

    /// Execute the build with `now` as the generation timestamp.
    ///
    /// A missing or malformed content store degrades to empty collections;
    /// the first write failure aborts the build.
    pub fn build_at(&self, now: DateTime<Utc>) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        // 1. Load content
        let store = ContentStore::load_lenient(&self.content_dir);
        stats.posts = store.posts.len();
        stats.apps = store.site.apps.len();

        let writer = ArtifactWriter::new(&self.output_dir);

        // 2. Sitemaps
        let sitemaps = SitemapGenerator::new(self.config.clone());
        let rendered = [
            (sitemap::PAGES_FILE, sitemaps.pages(now)),
            (sitemap::POSTS_FILE, sitemaps.posts(&store.posts)),
            (sitemap::CATEGORIES_FILE, sitemaps.categories(now)),
            (sitemap::TAGS_FILE, sitemaps.tags(now)),
            (sitemap::APPS_FILE, sitemaps.apps(&store.site.apps, now)),
            (sitemap::INDEX_FILE, sitemaps.index(now)),
        ];
        for (name, xml) in &rendered {
            writer.write(name, xml)?;
            stats.artifacts += 1;
        }

        // 3. robots.txt
        writer.write(ROBOTS_FILE, &RobotsGenerator::new(self.config.clone()).generate())?;
        stats.artifacts += 1;

        // 4. Feeds
        let rss = RssGenerator::new(self.config.clone()).generate(&store.posts, now);
        writer.write(RSS_FILE, &rss)?;
        stats.artifacts += 1;

        let atom = AtomGenerator::new(self.config.clone()).generate(&store.posts, now);
        writer.write(ATOM_FILE, &atom)?;
        stats.artifacts += 1;

        // 5. IndexNow key file and changed-URL list
        if self.config.index_now.enabled {
            stats.changed = self.write_index_now_files(&writer, &store, now)?;
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            posts = stats.posts,
            apps = stats.apps,
            artifacts = stats.artifacts,
            changed = stats.changed,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    fn write_index_now_files(
        &self,
        writer: &ArtifactWriter,
        store: &ContentStore,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let key = &self.config.index_now.key;
        writer.write_plain(&format!("{key}.txt"), key)?;
        debug!("wrote IndexNow key file");

        let changed: Vec<String> = store
            .changed_since(now, self.config.changes.window_days)
            .iter()
            .map(|post| post.url_path())
            .collect();

        let json = serde_json::to_string_pretty(&changed)?;
        writer.write_plain(&self.config.changes.file, &json)?;
        info!(count = changed.len(), file = %self.config.changes.file, "wrote changed URLs");

        Ok(changed.len())
    }
}
