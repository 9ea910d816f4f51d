//! The conversion run: parse, filter, merge, replay, persist.

use thiserror::Error;
use tracing::info;

use cvc2git_log::{HeaderStyle, LogError, merge_chronological, parse_package_log};

use crate::{
    ReplayEngine, ReplayError, ReplayProgress, ResumeError, ResumeState, SourceControl,
    TargetError, TargetRepository,
};

/// The raw log text for one requested package.
///
/// Fetching (and caching) the text is the caller's concern; the core only
/// sees the stable line-oriented log format.
#[derive(Debug, Clone)]
pub struct PackageLogText {
    /// The requested package name, `:source` suffix already stripped.
    pub package: String,

    /// The complete `cvc log` output for that package.
    pub text: String,
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every package was already fully converted.
    NothingToConvert,

    /// New history was replayed.
    Converted {
        /// Number of commits appended to the target repository.
        commits: usize,
    },
}

/// Errors ending a conversion run.
#[derive(Debug, Error)]
pub enum RunError {
    /// A package log could not be parsed. Raised before any target
    /// mutation.
    #[error(transparent)]
    Log(#[from] LogError),

    /// The resume note was malformed, or a resume boundary is missing
    /// from its freshly fetched log. Raised before any target mutation.
    #[error(transparent)]
    Resume(#[from] ResumeError),

    /// The target repository failed outside of replay (note access).
    #[error(transparent)]
    Target(#[from] TargetError),

    /// A replay step failed; earlier commits of this run remain applied.
    #[error(transparent)]
    Replay(#[from] ReplayError),
}

/// Runs one conversion over the given package logs.
///
/// The sequence is fixed: load the resume note, parse and filter every
/// log, merge across packages, then replay oldest-first. All parsing and
/// filtering completes before the first commit is created, so any log or
/// resume problem aborts with the repository untouched.
///
/// # Errors
///
/// Returns [`RunError`]; see its variants for where each one can strike.
pub fn run<S, T>(
    source: &S,
    target: &T,
    logs: &[PackageLogText],
    style: HeaderStyle,
    on_progress: &mut dyn FnMut(ReplayProgress<'_>),
) -> Result<RunOutcome, RunError>
where
    S: SourceControl + ?Sized,
    T: TargetRepository + ?Sized,
{
    let mut resume = ResumeState::decode(target.read_resume_note()?.as_deref())?;

    let mut per_package = Vec::with_capacity(logs.len());
    for log in logs {
        let parsed = parse_package_log(&log.package, &log.text, style)?;
        let new = resume.filter_new(&parsed.package, parsed.commits)?;
        info!(
            package = %parsed.package,
            branch = %parsed.branch,
            new = new.len(),
            "filtered package history"
        );
        per_package.push(new);
    }

    let merged = merge_chronological(per_package);
    if merged.is_empty() {
        info!("nothing to convert");
        return Ok(RunOutcome::NothingToConvert);
    }

    let total = merged.len();
    info!(commits = total, "replaying merged history");
    ReplayEngine::new(source, target).replay(&merged, &mut resume, on_progress)?;

    Ok(RunOutcome::Converted { commits: total })
}
