//! Resume tracking: which revision of each package is already converted.
//!
//! The state is a package → last-converted-revision map, carried between
//! runs as a space-separated `package=revision` blob in a note on the
//! target repository's history tip. An absent note means nothing has been
//! converted yet.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use cvc2git_commit::CommitRecord;

/// Errors from resume-state handling.
#[derive(Debug, Error)]
pub enum ResumeError {
    /// The persisted note blob did not decode as `package=revision` pairs.
    #[error("malformed resume note entry: {0:?}")]
    MalformedNote(String),

    /// The recorded resume revision is missing from the freshly fetched
    /// log. The source history was rewritten or truncated; converting
    /// everything would duplicate history and converting nothing would
    /// silently drop commits, so neither is guessed.
    #[error(
        "resume revision {revision} for {package} not found in its log; \
         source history may have been rewritten"
    )]
    BoundaryNotFound {
        /// The package whose log no longer contains the boundary.
        package: String,
        /// The recorded last-converted revision.
        revision: String,
    },
}

/// Result type for resume-state operations.
pub type ResumeResult<T> = Result<T, ResumeError>;

/// The package → last-converted-revision map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeState {
    entries: BTreeMap<String, String>,
}

impl ResumeState {
    /// Creates an empty state (first run: convert everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the persisted note blob. `None` means no note: empty state.
    ///
    /// # Errors
    ///
    /// Returns [`ResumeError::MalformedNote`] for any token without a `=`.
    pub fn decode(note: Option<&str>) -> ResumeResult<Self> {
        let mut entries = BTreeMap::new();
        for token in note.unwrap_or_default().split_whitespace() {
            let (package, revision) = token
                .split_once('=')
                .ok_or_else(|| ResumeError::MalformedNote(token.to_string()))?;
            if package.is_empty() || revision.is_empty() {
                return Err(ResumeError::MalformedNote(token.to_string()));
            }
            entries.insert(package.to_string(), revision.to_string());
        }
        Ok(Self { entries })
    }

    /// Encodes the state back into the note blob form.
    ///
    /// Entries are emitted in package order, so the blob is deterministic.
    #[must_use]
    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .map(|(package, revision)| format!("{package}={revision}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The recorded last-converted revision for a package, if any.
    #[must_use]
    pub fn last_converted(&self, package: &str) -> Option<&str> {
        self.entries.get(package).map(String::as_str)
    }

    /// True if no package has been converted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Filters a package's freshly parsed commits down to the new ones.
    ///
    /// `commits` is newest-first, as parsed. With no resume point every
    /// commit is new. Otherwise the commits strictly newer than the
    /// boundary are returned (still newest-first); the boundary commit and
    /// everything older is excluded.
    ///
    /// # Errors
    ///
    /// Returns [`ResumeError::BoundaryNotFound`] when a resume point is
    /// recorded but absent from the log.
    pub fn filter_new(
        &self,
        package: &str,
        commits: Vec<CommitRecord>,
    ) -> ResumeResult<Vec<CommitRecord>> {
        let Some(boundary) = self.last_converted(package) else {
            debug!(package, commits = commits.len(), "no resume point");
            return Ok(commits);
        };

        let Some(position) = commits.iter().position(|c| c.revision == boundary) else {
            return Err(ResumeError::BoundaryNotFound {
                package: package.to_string(),
                revision: boundary.to_string(),
            });
        };

        debug!(package, boundary, new = position, "resume point found");
        Ok(commits.into_iter().take(position).collect())
    }

    /// Records `revision` as the last-converted revision for `package`.
    ///
    /// Called once per replayed commit; because replay is oldest-first
    /// within a package, the record always names the newest applied
    /// revision.
    pub fn record(&mut self, package: &str, revision: &str) {
        self.entries
            .insert(package.to_string(), revision.to_string());
    }
}
