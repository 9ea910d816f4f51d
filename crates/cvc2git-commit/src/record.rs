//! Structured representation of one historical cvc commit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One commit from a package's cvc history.
///
/// Records are immutable once constructed. The `revision` is opaque and
/// unique only within a single package's history; cross-package ordering
/// relies solely on [`CommitRecord::sort_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The source package name, without any `:source` suffix.
    pub package: String,

    /// The cvc branch label the log was taken from.
    pub branch: String,

    /// The cvc revision identifier (e.g. `0.86-0.1`, `tip-1`).
    pub revision: String,

    /// The commit author name.
    pub author_name: String,

    /// The commit author email.
    pub author_email: String,

    /// The commit date, second precision, UTC.
    pub timestamp: DateTime<Utc>,

    /// The reformatted commit message. May be empty.
    pub message: String,
}

impl CommitRecord {
    /// Creates a new commit record.
    #[must_use]
    pub fn new(
        package: impl Into<String>,
        branch: impl Into<String>,
        revision: impl Into<String>,
        author_name: impl Into<String>,
        author_email: impl Into<String>,
        timestamp: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            branch: branch.into(),
            revision: revision.into(),
            author_name: author_name.into(),
            author_email: author_email.into(),
            timestamp,
            message: message.into(),
        }
    }

    /// The key commits are merged on: the commit date.
    ///
    /// Equality stays field-wise; only the merge order is by date.
    #[must_use]
    pub fn sort_key(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the first line of the commit message (the subject).
    #[must_use]
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// The author in `Name <email>` form, as git renders identities.
    #[must_use]
    pub fn author(&self) -> String {
        format!("{} <{}>", self.author_name, self.author_email)
    }
}
