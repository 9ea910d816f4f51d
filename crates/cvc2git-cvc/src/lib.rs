//! Conary source-system client for cvc2git.
//!
//! [`CvcClient`] shells out to the `cvc` tool for log fetching and
//! revision checkouts; [`LogCache`] keeps the fetched logs on disk so a
//! conversion can run from cached history without touching the network.

mod cache;
mod client;

pub use cache::{CacheError, CacheResult, LogCache};
pub use client::CvcClient;
