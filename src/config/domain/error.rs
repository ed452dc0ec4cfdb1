//! Configuration errors.

use crate::workspace::domain::WorkspaceDomainError;
use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading, saving, or interpreting configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// No configuration file exists yet.
    #[error("configuration not found at {path}; run `multiagent init` first")]
    NotFound {
        /// Expected configuration location.
        path: Utf8PathBuf,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("malformed configuration at {path}: {source}")]
    Malformed {
        /// Configuration location.
        path: Utf8PathBuf,
        /// Decoding failure.
        source: Arc<serde_json::Error>,
    },

    /// The configured base branch is not a valid branch name.
    #[error(transparent)]
    InvalidBranch(#[from] WorkspaceDomainError),

    /// Reading or writing the configuration failed.
    #[error("configuration I/O error: {0}")]
    Io(Arc<std::io::Error>),
}

impl ConfigError {
    /// Wraps an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
