//! Parser for one package's `cvc log` output.
//!
//! The format is line-oriented and human-readable:
//!
//! ```text
//! Name  : epdb:source
//! Branch: /foresight.rpath.org@fl:2-devel
//!
//! tip-1 Og Maciel (omaciel@foresightlinux.org) Fri Jan 29 12:41:57 2010
//!     Version bump and now pulling from bitbucket.
//! ```
//!
//! Two metadata lines, then commit blocks, newest revision first. A commit
//! header is revision, author, and a fixed five-token date on one line;
//! everything indented below it is the message body.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use cvc2git_commit::{CommitRecord, parse_timestamp};

use crate::{HeaderStyle, LogError, LogResult};

/// The `name (email)` author blob. Emails are always parenthesized right
/// after the name, and neither part contains parentheses of its own.
static AUTHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*) \(([^()]*)\)$").expect("author pattern is valid"));

/// The number of whitespace tokens in a cvc date: weekday, month, day,
/// time, year.
const DATE_TOKENS: usize = 5;

/// The parsed history of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLog {
    /// Package name from the `Name` line, `:source` suffix stripped.
    pub package: String,

    /// Branch label from the `Branch` line.
    pub branch: String,

    /// Commits exactly as listed in the log: newest first.
    pub commits: Vec<CommitRecord>,
}

/// Parses the raw `cvc log` text for one package.
///
/// `requested` is the package identifier the caller asked for; it is only
/// used to attribute errors, the authoritative name comes from the log
/// itself. Commits come back newest-first, unsorted.
///
/// # Errors
///
/// Returns [`LogError`] if the metadata lines are missing or misordered, a
/// header line does not have the revision/author/date shape, or a date
/// does not parse. Any of these means the log cannot be trusted.
pub fn parse_package_log(
    requested: &str,
    text: &str,
    style: HeaderStyle,
) -> LogResult<PackageLog> {
    let lines: Vec<&str> = text.trim().lines().collect();

    let (package, branch) = parse_metadata(requested, &lines)?;
    debug!(package, branch, lines = lines.len(), "parsing package log");

    let body = &lines[2..];
    let mut commits = Vec::new();

    let mut i = locate_next_header(body, 0, style);
    while i < body.len() {
        let next = locate_next_header(body, i + 1, style);
        commits.push(parse_commit(&package, &branch, body[i], &body[i + 1..next])?);
        i = next;
    }

    debug!(package, commits = commits.len(), "parsed package log");
    Ok(PackageLog {
        package,
        branch,
        commits,
    })
}

/// Validates the two leading metadata lines and extracts their values.
fn parse_metadata(requested: &str, lines: &[&str]) -> LogResult<(String, String)> {
    let malformed = |reason: &str| LogError::MalformedMetadata {
        package: requested.to_string(),
        reason: reason.to_string(),
    };

    if lines.len() < 2 {
        return Err(malformed("log has fewer than two lines"));
    }
    if !lines[0].starts_with("Name") {
        return Err(malformed("first line does not start with Name"));
    }
    if !lines[1].starts_with("Branch") {
        return Err(malformed("second line does not start with Branch"));
    }

    // The value is the last whitespace token; the package name additionally
    // drops the `:source` suffix.
    let name_value = last_token(lines[0]).ok_or_else(|| malformed("Name line has no value"))?;
    let package = name_value
        .split(':')
        .next()
        .unwrap_or_default()
        .to_string();
    if package.is_empty() || package == "Name" {
        return Err(malformed("Name line has no value"));
    }

    let branch = last_token(lines[1]).ok_or_else(|| malformed("Branch line has no value"))?;

    Ok((package, branch.to_string()))
}

/// Last whitespace-separated token of a line, if the line has more than one.
fn last_token(line: &str) -> Option<&str> {
    let mut tokens = line.split_whitespace();
    tokens.next()?;
    tokens.last()
}

/// Index of the next header line at or after `begin`, or `lines.len()`.
fn locate_next_header(lines: &[&str], begin: usize, style: HeaderStyle) -> usize {
    let mut next = begin;
    while next < lines.len() && !style.is_header(lines[next]) {
        next += 1;
    }
    next
}

/// Parses one header line plus its indented message body.
fn parse_commit(
    package: &str,
    branch: &str,
    header: &str,
    body: &[&str],
) -> LogResult<CommitRecord> {
    let tokens: Vec<&str> = header.split_whitespace().collect();

    // revision + at least one author token + five date tokens
    if tokens.len() < 2 + DATE_TOKENS {
        return Err(LogError::MalformedHeader {
            package: package.to_string(),
            line: header.to_string(),
        });
    }

    let revision = tokens[0];
    let date_text = tokens[tokens.len() - DATE_TOKENS..].join(" ");
    let author_blob = tokens[1..tokens.len() - DATE_TOKENS].join(" ");

    let captures = AUTHOR_RE
        .captures(&author_blob)
        .ok_or_else(|| LogError::MalformedHeader {
            package: package.to_string(),
            line: header.to_string(),
        })?;
    let author_name = &captures[1];
    let author_email = &captures[2];

    let timestamp = parse_timestamp(&date_text).map_err(|source| LogError::BadTimestamp {
        package: package.to_string(),
        source,
    })?;

    Ok(CommitRecord::new(
        package,
        branch,
        revision,
        author_name,
        author_email,
        timestamp,
        reformat_message(body),
    ))
}

/// Reformats the raw message body lines.
///
/// Each physical line loses its indentation, interior blank lines survive,
/// and blank lines around the whole block are dropped.
fn reformat_message(lines: &[&str]) -> String {
    let joined = lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n");
    joined.trim().to_string()
}
