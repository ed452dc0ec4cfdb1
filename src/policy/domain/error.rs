//! Policy errors.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Reason a command was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationKind {
    /// The command was blank.
    #[error("empty command")]
    EmptyCommand,

    /// The command matched a blocked pattern.
    #[error("dangerous pattern detected: {0}")]
    DangerousPattern(String),

    /// The program is not on the allow list.
    #[error("command not allowed: {0}")]
    NotAllowed(String),

    /// The working directory lies outside the permitted root.
    #[error("working directory {cwd} is outside {root}")]
    OutsideRoot {
        /// Requested working directory.
        cwd: Utf8PathBuf,
        /// Permitted root.
        root: Utf8PathBuf,
    },
}

/// A shell action breached the command policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("policy violation for `{command}`: {kind}")]
pub struct PolicyViolation {
    /// The refused command.
    pub command: String,
    /// Why it was refused.
    pub kind: ViolationKind,
}

impl PolicyViolation {
    /// Creates a violation for `command`.
    #[must_use]
    pub fn new(command: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            command: command.into(),
            kind,
        }
    }
}

/// Invalid policy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyDomainError {
    /// A blocked pattern is not a valid regular expression.
    #[error("invalid blocked pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
}
