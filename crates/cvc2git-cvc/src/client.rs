//! The `cvc` subprocess client.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use cvc2git_core::{SourceControl, SourceError, SourceResult};

/// Talks to Conary through the `cvc` command-line tool.
///
/// Every call is one synchronous subprocess invocation; cvc operations
/// are network-bound and may take arbitrarily long, and there is no
/// cancellation protocol to hook into. A non-zero exit aborts the run
/// with whatever cvc printed on stderr.
pub struct CvcClient {
    binary: String,
}

impl Default for CvcClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CvcClient {
    /// Creates a client using `cvc` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_binary("cvc")
    }

    /// Creates a client using a specific cvc executable.
    #[must_use]
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn run(&self, args: &[&str]) -> std::io::Result<std::process::Output> {
        debug!(binary = %self.binary, ?args, "invoking cvc");
        Command::new(&self.binary).args(args).output()
    }
}

/// Trims cvc's stderr into a one-line failure reason.
fn failure_reason(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        format!("cvc exited with {}", output.status)
    } else {
        trimmed.to_string()
    }
}

impl SourceControl for CvcClient {
    fn fetch_log(&self, package: &str) -> SourceResult<String> {
        let trove = format!("{package}:source");
        let output = self.run(&["log", &trove])?;

        if !output.status.success() {
            return Err(SourceError::FetchLog {
                package: package.to_string(),
                reason: failure_reason(&output),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn checkout(
        &self,
        package: &str,
        branch: &str,
        revision: &str,
        dest: &Path,
    ) -> SourceResult<()> {
        let trove = format!("{package}={branch}/{revision}");
        let dir = format!("--dir={}", dest.display());
        let output = self.run(&["checkout", &trove, &dir])?;

        if !output.status.success() {
            return Err(SourceError::Checkout {
                package: package.to_string(),
                revision: revision.to_string(),
                reason: failure_reason(&output),
            });
        }

        Ok(())
    }
}
