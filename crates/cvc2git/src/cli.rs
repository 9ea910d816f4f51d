//! CLI definition.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use cvc2git_log::HeaderStyle;

use crate::convert;

/// Convert the cvc history of Conary `:source` packages into one git
/// repository, preserving authorship, dates, and messages. Re-running
/// appends only the commits made since the previous run.
#[derive(Debug, Parser)]
#[command(name = "cvc2git")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Packages to convert, with or without a `:source` suffix
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Read more package names from a file, one per line
    #[arg(long, value_name = "FILE")]
    pub package_list: Option<PathBuf>,

    /// Directory holding the cached `cvc log` output, one file per package
    #[arg(long, value_name = "DIR")]
    pub history_dir: PathBuf,

    /// Where the git repository lives (or will be created)
    #[arg(long, value_name = "DIR")]
    pub git_dir: PathBuf,

    /// Reuse an existing git repository instead of creating a new one
    #[arg(long)]
    pub no_init_git: bool,

    /// Convert from the cached logs as-is, without refreshing them first
    #[arg(long)]
    pub no_fetch: bool,

    /// Which rule tells commit header lines apart from message lines
    #[arg(long, value_enum, default_value_t = HeaderStyleArg::Any)]
    pub header_style: HeaderStyleArg,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI face of [`HeaderStyle`]; the two historical log format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeaderStyleArg {
    /// Headers start with a digit (numeric revision naming)
    Digit,
    /// Headers start with any non-whitespace character
    Any,
}

impl From<HeaderStyleArg> for HeaderStyle {
    fn from(arg: HeaderStyleArg) -> Self {
        match arg {
            HeaderStyleArg::Digit => HeaderStyle::DigitPrefixed,
            HeaderStyleArg::Any => HeaderStyle::AnyNonWhitespace,
        }
    }
}

impl Cli {
    /// Runs the conversion.
    pub fn run(self) -> Result<()> {
        convert::run(self)
    }
}
