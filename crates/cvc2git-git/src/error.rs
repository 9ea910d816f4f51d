//! Git error types.

use thiserror::Error;

/// Git-related errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Asked to create a repository where something already exists.
    #[error("{0} already exists; pass --no-init-git to reuse it")]
    AlreadyExists(std::path::PathBuf),

    /// Asked to reuse a repository that does not exist.
    #[error("repository not found at {0}")]
    RepoNotFound(std::path::PathBuf),

    /// The path exists but is not a git repository.
    #[error("not a git repository: {0}")]
    NotARepo(std::path::PathBuf),

    /// The repository has no working directory to materialize into.
    #[error("repository at {0} is bare")]
    Bare(std::path::PathBuf),

    /// Git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;
