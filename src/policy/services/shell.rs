//! Shell runner that refuses commands breaching the policy.

use crate::policy::domain::{CommandPolicy, PolicyViolation};
use camino::Utf8Path;
use std::io;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Time budget for one shell command unless configured otherwise.
pub const DEFAULT_SHELL_TIMEOUT: Duration = Duration::from_secs(300);

/// Errors returned by [`ShellRunner`].
#[derive(Debug, Clone, Error)]
pub enum ShellError {
    /// The command or its working directory breached the policy.
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    /// The command exceeded its time budget and was killed.
    #[error("`{command}` timed out after {timeout_secs}s")]
    TimedOut {
        /// Command that timed out.
        command: String,
        /// Budget in seconds.
        timeout_secs: u64,
    },

    /// The shell could not be spawned.
    #[error("failed to spawn shell: {0}")]
    Io(Arc<io::Error>),
}

impl ShellError {
    /// Returns whether a retry could succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// Captured result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, absent when the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns whether the command exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Runs validated commands through `sh -c`.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    policy: CommandPolicy,
    timeout: Duration,
}

impl ShellRunner {
    /// Creates a runner enforcing `policy`.
    #[must_use]
    pub const fn new(policy: CommandPolicy) -> Self {
        Self {
            policy,
            timeout: DEFAULT_SHELL_TIMEOUT,
        }
    }

    /// Sets the per-command time budget.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the enforced policy.
    #[must_use]
    pub const fn policy(&self) -> &CommandPolicy {
        &self.policy
    }

    /// Validates and runs `command`, in `cwd` when given.
    ///
    /// A non-zero exit is not an error; inspect [`CommandOutput::code`].
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Policy`] without running anything when the
    /// command or directory is refused, [`ShellError::TimedOut`] when the
    /// budget expires, and [`ShellError::Io`] when the shell cannot start.
    pub async fn run(
        &self,
        command: &str,
        cwd: Option<&Utf8Path>,
    ) -> Result<CommandOutput, ShellError> {
        self.policy.validate(command).inspect_err(|violation| {
            warn!(command, reason = %violation.kind, "command refused by policy");
        })?;
        let mut process = Command::new("sh");
        process
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        let directory = match cwd {
            Some(dir) => Some(self.policy.validate_cwd(command, dir)?),
            None => self.policy.root().map(Utf8Path::to_path_buf),
        };
        if let Some(dir) = &directory {
            process.current_dir(dir);
        }

        debug!(command, cwd = ?directory, "running shell command");
        let output = tokio::time::timeout(self.timeout, process.output())
            .await
            .map_err(|_| {
                warn!(command, timeout_secs = self.timeout.as_secs(), "shell command timed out");
                ShellError::TimedOut {
                    command: command.to_owned(),
                    timeout_secs: self.timeout.as_secs(),
                }
            })?
            .map_err(|err| ShellError::Io(Arc::new(err)))?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        info!(command, code = ?result.code, "shell command finished");
        debug!(stdout = %result.stdout, stderr = %result.stderr, "shell command output");
        Ok(result)
    }
}
