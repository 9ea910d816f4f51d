//! The replay engine: applies converted commits to the target repository.

use std::fs;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use cvc2git_commit::CommitRecord;

use crate::{ResumeState, SourceControl, SourceError, TargetError, TargetRepository};

/// The source system's own bookkeeping file inside a checked-out tree.
/// It must never enter the converted history.
pub const SOURCE_METADATA_FILE: &str = "CONARY";

/// The step that failed inside [`ReplayError`].
#[derive(Debug, Error)]
pub enum ReplayStepError {
    /// Materializing the revision failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Staging or committing failed.
    #[error(transparent)]
    Target(#[from] TargetError),

    /// Preparing the working area failed.
    #[error("workspace cleanup failed: {0}")]
    Workspace(#[source] std::io::Error),
}

/// A replay failure, attributed to the offending commit.
///
/// Everything committed before this commit stays in the repository; the
/// resume note already reflects it, so re-running the tool picks up
/// exactly here.
#[derive(Debug, Error)]
#[error("replaying {package}={revision} failed: {source}")]
pub struct ReplayError {
    /// The package whose commit failed.
    pub package: String,
    /// The revision that failed.
    pub revision: String,
    #[source]
    source: ReplayStepError,
}

/// Per-commit progress, emitted before the commit is applied.
///
/// Purely informational; dropping every event changes nothing about the
/// conversion.
#[derive(Debug, Clone, Copy)]
pub struct ReplayProgress<'a> {
    /// 1-based position in the replay sequence.
    pub index: usize,
    /// Total number of commits in this run.
    pub total: usize,
    /// The commit date.
    pub timestamp: DateTime<Utc>,
    /// The package being converted.
    pub package: &'a str,
    /// The revision being converted.
    pub revision: &'a str,
}

/// Replays a chronological commit sequence against the target repository.
///
/// Strictly sequential: one commit at a time, in order, never skipping.
/// The target repository only supports appending one commit to a linear
/// chain, and the source system materializes into a single shared working
/// directory, so there is nothing to parallelize.
pub struct ReplayEngine<'a, S: SourceControl + ?Sized, T: TargetRepository + ?Sized> {
    source: &'a S,
    target: &'a T,
}

impl<'a, S: SourceControl + ?Sized, T: TargetRepository + ?Sized> ReplayEngine<'a, S, T> {
    /// Creates an engine over the two collaborators.
    pub fn new(source: &'a S, target: &'a T) -> Self {
        Self { source, target }
    }

    /// Applies `commits` in order, updating `resume` as each one lands.
    ///
    /// After every successful commit the resume note is rewritten, so an
    /// abort at commit k leaves the repository and the note agreeing on
    /// exactly k-1 conversions.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] for the first commit whose materialization,
    /// staging, commit creation, or note update fails. Nothing after it is
    /// attempted.
    pub fn replay(
        &self,
        commits: &[CommitRecord],
        resume: &mut ResumeState,
        on_progress: &mut dyn FnMut(ReplayProgress<'_>),
    ) -> Result<(), ReplayError> {
        let total = commits.len();
        for (i, commit) in commits.iter().enumerate() {
            on_progress(ReplayProgress {
                index: i + 1,
                total,
                timestamp: commit.timestamp,
                package: &commit.package,
                revision: &commit.revision,
            });

            self.apply(commit).map_err(|source| ReplayError {
                package: commit.package.clone(),
                revision: commit.revision.clone(),
                source,
            })?;

            resume.record(&commit.package, &commit.revision);
            self.target
                .write_resume_note(&resume.encode())
                .map_err(|e| ReplayError {
                    package: commit.package.clone(),
                    revision: commit.revision.clone(),
                    source: e.into(),
                })?;
        }
        Ok(())
    }

    /// One atomic replay step: materialize, scrub, stage, commit.
    fn apply(&self, commit: &CommitRecord) -> Result<(), ReplayStepError> {
        debug!(
            package = %commit.package,
            revision = %commit.revision,
            "replaying commit"
        );

        let tree = self.target.workdir().join(&commit.package);

        // A stale working copy from the previous step would leak deleted
        // files into this revision's tree.
        if tree.exists() {
            fs::remove_dir_all(&tree).map_err(ReplayStepError::Workspace)?;
        }

        self.source
            .checkout(&commit.package, &commit.branch, &commit.revision, &tree)?;

        let metadata = tree.join(SOURCE_METADATA_FILE);
        if metadata.exists() {
            fs::remove_file(&metadata).map_err(ReplayStepError::Workspace)?;
        }

        self.target.stage_package(&commit.package)?;
        self.target
            .create_commit(commit, &provenance_message(commit))?;

        Ok(())
    }
}

/// The target commit message: the original message plus a provenance line
/// naming the source revision. An empty original message yields just the
/// provenance line.
#[must_use]
pub fn provenance_message(commit: &CommitRecord) -> String {
    if commit.message.is_empty() {
        format!("cvc revision: {}", commit.revision)
    } else {
        format!("{}\n\ncvc revision: {}", commit.message, commit.revision)
    }
}
