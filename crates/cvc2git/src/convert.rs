//! The conversion command: wiring the collaborators into a run.

use std::collections::HashSet;
use std::fs;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use cvc2git_core::{PackageLogText, ReplayProgress, RunOutcome, TargetRepository};
use cvc2git_cvc::{CvcClient, LogCache};
use cvc2git_git::{BootstrapMode, Repository};

use crate::cli::Cli;

/// Runs one conversion: bootstrap the repository, gather the logs, hand
/// everything to the core pipeline, and report how it went.
pub fn run(cli: Cli) -> Result<()> {
    let packages = collect_packages(&cli)?;
    debug!(?packages, "packages to convert");

    let mode = if cli.no_init_git {
        BootstrapMode::ReuseExisting
    } else {
        BootstrapMode::CreateNew
    };
    let repo = Repository::bootstrap(&cli.git_dir, mode)?;
    if cli.no_init_git {
        println!(
            "Reusing the git repo at {} (branch: {}; HEAD: `{}`).",
            cli.git_dir.display(),
            repo.branch()?,
            repo.head_description()?
        );
    } else {
        println!("New git repo created at {}.", cli.git_dir.display());
    }

    let client = CvcClient::new();
    let cache = LogCache::new(&cli.history_dir);
    let mut logs = Vec::with_capacity(packages.len());
    for package in &packages {
        let text = if cli.no_fetch {
            cache.read(package)?
        } else {
            cache.refresh(&client, package)?
        };
        logs.push(PackageLogText {
            package: package.clone(),
            text,
        });
    }

    let bar = progress_bar()?;
    let outcome = cvc2git_core::run(
        &client,
        &repo,
        &logs,
        cli.header_style.into(),
        &mut |progress| render_progress(&bar, &progress),
    );
    // Clear the bar on failure too, so it does not sit above the error.
    bar.finish_and_clear();
    let outcome = outcome?;

    match outcome {
        RunOutcome::NothingToConvert => println!("Nothing to convert."),
        RunOutcome::Converted { commits } => println!(
            "Converted {commits} commit(s). HEAD of the git repo is now: `{}`.",
            repo.head_description()?
        ),
    }
    Ok(())
}

/// Positional packages plus the optional package-list file, normalized
/// (no `:source` suffix) and deduplicated in encounter order.
fn collect_packages(cli: &Cli) -> Result<Vec<String>> {
    let mut packages = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |name: &str| {
        let normalized = name.trim().split(':').next().unwrap_or_default().to_string();
        if !normalized.is_empty() && seen.insert(normalized.clone()) {
            packages.push(normalized);
        }
    };

    for name in &cli.packages {
        push(name);
    }

    if let Some(path) = &cli.package_list {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading package list {}", path.display()))?;
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            push(line);
        }
    }

    if packages.is_empty() {
        bail!("nothing to convert: pass package names or --package-list");
    }
    Ok(packages)
}

fn progress_bar() -> Result<ProgressBar> {
    let style = ProgressStyle::with_template("converting [{pos}/{len} {percent}%] {msg}")?;
    Ok(ProgressBar::new(0).with_style(style))
}

#[allow(clippy::cast_possible_truncation)] // commit counts fit in u64
fn render_progress(bar: &ProgressBar, progress: &ReplayProgress<'_>) {
    if bar.length() != Some(progress.total as u64) {
        bar.set_length(progress.total as u64);
    }
    bar.set_position(progress.index as u64);
    bar.set_message(format!(
        "{} {}={}",
        progress.timestamp.format("%Y-%m-%d"),
        progress.package,
        progress.revision
    ));
}
