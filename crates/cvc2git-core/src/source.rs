//! Source-system capability trait.

use std::path::Path;

use thiserror::Error;

/// Errors from the source revision-control system.
#[derive(Debug, Error)]
pub enum SourceError {
    /// `cvc log` (or equivalent) failed.
    #[error("fetching log for {package} failed: {reason}")]
    FetchLog {
        /// The package whose log was requested.
        package: String,
        /// What the source tool reported.
        reason: String,
    },

    /// Materializing a revision failed.
    #[error("checkout of {package}={revision} failed: {reason}")]
    Checkout {
        /// The package being materialized.
        package: String,
        /// The revision being materialized.
        revision: String,
        /// What the source tool reported.
        reason: String,
    },

    /// IO error talking to the source system or its cache.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for source-system operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Operations the conversion needs from the source system.
///
/// Calls are synchronous and may block for as long as the source system
/// takes; the source protocol has no cancellation primitive, so none is
/// imposed here. There are no retries: a failed call fails the run, and
/// re-running the tool is the retry mechanism.
pub trait SourceControl {
    /// Fetches the raw log text for one package.
    fn fetch_log(&self, package: &str) -> SourceResult<String>;

    /// Materializes the full package tree at `revision` into `dest`.
    ///
    /// This is a complete checkout, not a diff: the source system has no
    /// cheap notion of "changes between two revisions". `dest` must not
    /// exist yet; the caller removes any stale working copy first.
    fn checkout(&self, package: &str, branch: &str, revision: &str, dest: &Path)
    -> SourceResult<()>;
}
