//! Log parsing error types.

use thiserror::Error;

/// Errors raised while parsing a package's `cvc log` output.
///
/// All of these are fatal for the whole run: a log that cannot be parsed
/// means the historical data cannot be trusted, and the target repository
/// must not be touched.
#[derive(Debug, Error)]
pub enum LogError {
    /// The first two lines are not the `Name`/`Branch` metadata pair.
    #[error("malformed log for {package:?}: {reason}")]
    MalformedMetadata {
        /// The package whose log was being parsed, as requested.
        package: String,
        /// What was wrong with the metadata lines.
        reason: String,
    },

    /// A commit header line did not have the expected token shape.
    #[error("malformed commit header in log for {package:?}: {line:?}")]
    MalformedHeader {
        /// The package whose log was being parsed.
        package: String,
        /// The offending header line.
        line: String,
    },

    /// A commit header carried an unparseable date.
    #[error("bad timestamp in log for {package:?}: {source}")]
    BadTimestamp {
        /// The package whose log was being parsed.
        package: String,
        #[source]
        source: cvc2git_commit::TimestampError,
    },
}

/// Result type for log parsing.
pub type LogResult<T> = Result<T, LogError>;
