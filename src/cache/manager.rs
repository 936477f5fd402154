//! Cache manager for persisting the quiz feed to disk
//!
//! Provides a `QuizCache` that stores the raw feed body in a single file and
//! reads it back with the time it was written.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// File name of the cached feed
const CACHE_FILE: &str = "quizzes.json";

/// Result of reading from cache
#[derive(Debug, Clone)]
pub struct CachedFeed {
    /// The feed body exactly as it was fetched
    pub bytes: Vec<u8>,
    /// When the file was last written, if the filesystem reports it
    pub cached_at: Option<DateTime<Utc>>,
}

/// Manages the on-disk copy of the last successful feed
///
/// The file lives in an XDG-compliant cache directory (`~/.cache/iquiz/` on
/// Linux). Writes replace the whole file through a rename, so a reader never
/// sees a partially written feed.
#[derive(Debug, Clone)]
pub struct QuizCache {
    /// Directory where the cache file is stored
    cache_dir: PathBuf,
}

impl QuizCache {
    /// Creates a new QuizCache using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "iquiz")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new QuizCache with a custom cache directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory holding the cache file
    pub fn dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Full path of the cache file
    pub fn path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE)
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Replaces the cached feed with `bytes`
    ///
    /// The body is written to a sibling temp file first and then renamed over
    /// the cache file.
    pub fn write(&self, bytes: &[u8]) -> io::Result<()> {
        self.ensure_dir()?;

        let path = self.path();
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, bytes)?;
        fs::rename(&tmp_path, &path)?;

        debug!(path = %path.display(), len = bytes.len(), "quiz cache written");
        Ok(())
    }

    /// Reads the cached feed
    ///
    /// Returns `None` if the file doesn't exist or cannot be read.
    pub fn read(&self) -> Option<CachedFeed> {
        let path = self.path();
        let bytes = fs::read(&path).ok()?;
        let cached_at = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        Some(CachedFeed { bytes, cached_at })
    }
}
