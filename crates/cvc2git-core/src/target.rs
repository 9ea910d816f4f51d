//! Target-repository capability trait.

use std::path::Path;

use thiserror::Error;

use cvc2git_commit::CommitRecord;

/// Head description used when the target repository has no commits yet.
pub const INITIAL_HEAD: &str = "Initial commit";

/// Errors from the target version-control system.
#[derive(Debug, Error)]
pub enum TargetError {
    /// Opening or creating the repository failed.
    #[error("repository bootstrap failed: {0}")]
    Bootstrap(String),

    /// Staging a package tree failed.
    #[error("staging {package} failed: {reason}")]
    Stage {
        /// The package path being staged.
        package: String,
        /// What the target system reported.
        reason: String,
    },

    /// Creating a commit failed.
    #[error("creating commit failed: {0}")]
    Commit(String),

    /// Reading or writing the resume note failed.
    #[error("resume note access failed: {0}")]
    Note(String),

    /// IO error in the repository working area.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for target-repository operations.
pub type TargetResult<T> = Result<T, TargetError>;

/// Operations the conversion needs from the target repository.
///
/// The repository is append-only for the duration of a run: commits are
/// added one at a time, in order, and the resume note on the history tip
/// is the only other thing written.
pub trait TargetRepository {
    /// The currently checked-out branch name.
    fn branch(&self) -> TargetResult<String>;

    /// A one-line description of the current head commit, or
    /// [`INITIAL_HEAD`] when no commits exist yet.
    fn head_description(&self) -> TargetResult<String>;

    /// The working directory packages are materialized into.
    fn workdir(&self) -> &Path;

    /// Stages everything under the package path: additions, modifications,
    /// and deletions relative to the current index. A full-tree sync, not
    /// a file list.
    fn stage_package(&self, package: &str) -> TargetResult<()>;

    /// Creates a commit with the record's author identity and date, used
    /// verbatim for both author and committer. Empty diffs and empty
    /// messages are both allowed; the source recorded an event either way.
    fn create_commit(&self, record: &CommitRecord, message: &str) -> TargetResult<()>;

    /// Reads the resume note attached to the current head, if any.
    fn read_resume_note(&self) -> TargetResult<Option<String>>;

    /// Attaches (or overwrites) the resume note on the current head.
    fn write_resume_note(&self, note: &str) -> TargetResult<()>;
}
