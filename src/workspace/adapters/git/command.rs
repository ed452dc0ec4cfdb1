//! Bounded `git` subprocess execution.

use crate::workspace::ports::{WorkspaceError, WorkspaceResult};
use camino::Utf8Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Time budget applied to each git invocation unless configured otherwise.
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(300);

/// Runs `git` commands against a directory with a bounded timeout.
///
/// Interactive prompts are disabled so a command waiting for credentials
/// fails instead of hanging until the timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitRunner {
    timeout: Duration,
}

impl Default for GitRunner {
    fn default() -> Self {
        Self::new(DEFAULT_GIT_TIMEOUT)
    }
}

impl GitRunner {
    /// Creates a runner with the given per-command time budget.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Returns the per-command time budget.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `git -C <dir> <args>` and returns its standard output.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::CommandFailed`] on a non-zero exit,
    /// [`WorkspaceError::TimedOut`] when the budget expires, and
    /// [`WorkspaceError::Io`] when `git` cannot be spawned.
    pub async fn run(&self, dir: &Utf8Path, args: &[&str]) -> WorkspaceResult<String> {
        let output = self.output(dir, args).await?;
        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
        warn!(
            dir = %dir,
            command = %render(args),
            status = %output.status,
            stderr = %stderr,
            "git command failed"
        );
        Err(WorkspaceError::CommandFailed {
            command: render(args),
            status: output.status.to_string(),
            stderr,
        })
    }

    /// Runs `git -C <dir> <args>` and reports whether it exited successfully.
    ///
    /// Used for probes such as `rev-parse --verify`, where a non-zero exit
    /// is an answer rather than a failure.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::TimedOut`] when the budget expires and
    /// [`WorkspaceError::Io`] when `git` cannot be spawned.
    pub async fn probe(&self, dir: &Utf8Path, args: &[&str]) -> WorkspaceResult<bool> {
        Ok(self.output(dir, args).await?.status.success())
    }

    async fn output(&self, dir: &Utf8Path, args: &[&str]) -> WorkspaceResult<Output> {
        debug!(dir = %dir, command = %render(args), "running git");
        let mut command = Command::new("git");
        command
            .arg("-C")
            .arg(dir.as_str())
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| WorkspaceError::TimedOut {
                command: render(args),
                timeout_secs: self.timeout.as_secs(),
            })?
            .map_err(WorkspaceError::io)
    }
}

fn render(args: &[&str]) -> String {
    format!("git {}", args.join(" "))
}
