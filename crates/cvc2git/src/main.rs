//! cvc2git CLI - Convert Conary package history into a git repository.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod convert;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging; --verbose lowers the default level to debug.
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    cli.run()
}
