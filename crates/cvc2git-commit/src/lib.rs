//! Commit types for cvc2git.
//!
//! This crate provides the structured representation of one historical
//! cvc commit, shared by the log parser, the merger, and the replay
//! engine: [`CommitRecord`].

mod record;
mod timestamp;

pub use record::CommitRecord;
pub use timestamp::{CVC_TIMESTAMP_FORMAT, TimestampError, format_timestamp, parse_timestamp};
