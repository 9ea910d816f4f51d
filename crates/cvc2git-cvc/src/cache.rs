//! The on-disk log cache.
//!
//! One plain-text file per package, `<history-dir>/<package>.log`,
//! holding the raw `cvc log` output. The cache is the input contract for
//! the parser: refreshing it is the only networked step of a run, and a
//! run with `--no-fetch` never goes past this directory.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use cvc2git_core::{SourceControl, SourceError};

/// Errors reading or refreshing the log cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A cached log file could not be read. Fatal before any target
    /// mutation: without trusted history there is nothing to convert.
    #[error("cannot read cached log {path}: {source}")]
    Unreadable {
        /// The cache file that failed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a refreshed log file failed.
    #[error("cannot write cached log {path}: {source}")]
    Unwritable {
        /// The cache file that failed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fetching the fresh log from the source system failed.
    #[error(transparent)]
    Fetch(#[from] SourceError),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// The per-package log cache directory.
pub struct LogCache {
    dir: PathBuf,
}

impl LogCache {
    /// Creates a cache over the given history directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The cache file for one package.
    #[must_use]
    pub fn path_for(&self, package: &str) -> PathBuf {
        self.dir.join(format!("{package}.log"))
    }

    /// Reads a package's cached log text.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unreadable`] if the file is missing or
    /// unreadable.
    pub fn read(&self, package: &str) -> CacheResult<String> {
        let path = self.path_for(package);
        debug!(?path, "reading cached log");
        fs::read_to_string(&path).map_err(|source| CacheError::Unreadable { path, source })
    }

    /// Fetches a fresh log from the source system and rewrites the cache
    /// file, returning the text.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Fetch`] if the source system fails, or
    /// [`CacheError::Unwritable`] if the cache cannot be updated.
    pub fn refresh(&self, source: &dyn SourceControl, package: &str) -> CacheResult<String> {
        let text = source.fetch_log(package)?;

        let path = self.path_for(package);
        info!(package, path = %path.display(), "refreshed log cache");
        write_file(&self.dir, &path, &text)?;
        Ok(text)
    }
}

fn write_file(dir: &Path, path: &Path, text: &str) -> CacheResult<()> {
    fn failed(path: &Path) -> impl FnOnce(std::io::Error) -> CacheError {
        let path = path.to_path_buf();
        move |source| CacheError::Unwritable { path, source }
    }
    fs::create_dir_all(dir).map_err(failed(path))?;
    fs::write(path, text).map_err(failed(path))
}
