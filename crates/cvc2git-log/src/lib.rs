//! `cvc log` parsing and chronological merging.
//!
//! This crate turns the raw text of one package's `cvc log` output into an
//! ordered sequence of [`cvc2git_commit::CommitRecord`]s ([`parse_package_log`])
//! and merges the per-package sequences into the single oldest-first order
//! the replay engine applies them in ([`merge_chronological`]).

mod error;
mod header;
mod merge;
mod parser;

pub use error::{LogError, LogResult};
pub use header::HeaderStyle;
pub use merge::merge_chronological;
pub use parser::{PackageLog, parse_package_log};
