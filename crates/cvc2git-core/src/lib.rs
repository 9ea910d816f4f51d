//! Conversion core for cvc2git.
//!
//! Everything with real invariants lives here: the resume tracker that
//! keeps repeated runs incremental ([`ResumeState`]), the replay engine
//! that applies commits to the target repository in strict chronological
//! order ([`ReplayEngine`]), and the run pipeline tying them together
//! ([`run`]).
//!
//! The core never talks to `cvc` or git directly. Both systems sit behind
//! capability traits ([`SourceControl`], [`TargetRepository`]) so the
//! engine can be exercised against in-memory fakes.

mod pipeline;
mod replay;
mod resume;
mod source;
mod target;

#[cfg(test)]
mod testing;

pub use pipeline::{PackageLogText, RunError, RunOutcome, run};
pub use replay::{ReplayEngine, ReplayError, ReplayProgress, SOURCE_METADATA_FILE};
pub use resume::{ResumeError, ResumeResult, ResumeState};
pub use source::{SourceControl, SourceError, SourceResult};
pub use target::{INITIAL_HEAD, TargetError, TargetRepository, TargetResult};
