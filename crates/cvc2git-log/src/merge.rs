//! Cross-package chronological merge.

use cvc2git_commit::CommitRecord;

/// Flattens per-package commit lists into one replay-ordered sequence.
///
/// Input lists are newest-first (as parsed); the result is ascending by
/// commit date, oldest first, which is the order commits must be replayed
/// in. The sort is stable: commits with identical dates keep their input
/// encounter order, since no cross-package causal relationship exists to
/// break the tie with.
#[must_use]
pub fn merge_chronological(per_package: Vec<Vec<CommitRecord>>) -> Vec<CommitRecord> {
    let mut merged: Vec<CommitRecord> = per_package.into_iter().flatten().collect();
    merged.sort_by_key(CommitRecord::sort_key);
    merged
}
