//! Canonical cvc timestamp handling.
//!
//! `cvc log` prints commit dates as `Fri Jan 29 12:41:57 2010` — weekday,
//! month, day, time, year, always five whitespace-separated tokens, no
//! zone. Dates are UTC and have no sub-second precision.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// The strftime layout of a cvc log date.
pub const CVC_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Parse layout: everything after the weekday token.
const DATE_PART_FORMAT: &str = "%b %d %H:%M:%S %Y";

/// Error produced when a cvc date token sequence cannot be parsed.
#[derive(Debug, Error)]
#[error("invalid cvc timestamp {text:?}: {source}")]
pub struct TimestampError {
    /// The text that failed to parse.
    pub text: String,
    source: chrono::ParseError,
}

/// Parses a cvc log date (`Fri Jan 29 12:41:57 2010`) into a UTC instant.
///
/// The weekday token is skipped, not validated: logs in the wild carry
/// weekdays that contradict the date, and the date wins.
///
/// # Errors
///
/// Returns an error if the tokens after the weekday do not form a valid
/// date.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, TimestampError> {
    let date_part = text.split_once(' ').map_or(text, |(_, rest)| rest);
    NaiveDateTime::parse_from_str(date_part, DATE_PART_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| TimestampError {
            text: text.to_string(),
            source,
        })
}

/// Formats a UTC instant back into the canonical cvc layout.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(CVC_TIMESTAMP_FORMAT).to_string()
}
