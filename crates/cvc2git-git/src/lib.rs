//! Git target-repository layer for cvc2git.
//!
//! Wraps git2 behind the core's [`cvc2git_core::TargetRepository`]
//! capability trait: repository bootstrap, full-tree staging, commits
//! with verbatim source authorship, and the resume note on HEAD.

mod error;
mod repository;

pub use error::{GitError, GitResult};
pub use repository::{BootstrapMode, Repository};
