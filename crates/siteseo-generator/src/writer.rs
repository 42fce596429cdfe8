//! Artifact writing.
//!
//! Every artifact is written verbatim and then compressed into a `.gz`
//! sibling. The compressed copy is produced from the bytes read back from
//! disk, so it always decodes to exactly what the plain file holds.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use flate2::{Compression, write::GzEncoder};
use thiserror::Error;
use tracing::debug;

/// Artifact writing errors.
#[derive(Debug, Error)]
pub enum WriteError {
    /// IO error on a specific path.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for writer operations.
pub type Result<T> = std::result::Result<T, WriteError>;

trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Writes artifacts into an output directory.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer rooted at `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `content` to `name` and its gzip companion to `name.gz`.
    ///
    /// Returns the path of the plain file.
    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.write_plain(name, content)?;

        let bytes = fs::read(&path).at(&path)?;
        let gz = gz_path(&path);
        let file = File::create(&gz).at(&gz)?;
        let mut encoder = GzEncoder::new(file, Compression::best());
        encoder.write_all(&bytes).at(&gz)?;
        encoder.finish().at(&gz)?;

        debug!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
        Ok(path)
    }

    /// Write `content` to `name` without a gzip companion.
    pub fn write_plain(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        fs::write(&path, content).at(&path)?;

        Ok(path)
    }
}

/// Path of the gzip companion of `path`.
pub fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}
