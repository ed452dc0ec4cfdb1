//! Loads and saves `config.json`.

use crate::config::domain::{AppConfig, ConfigError};
use camino::{Utf8Path, Utf8PathBuf};
use std::io;
use std::sync::Arc;
use tracing::info;

/// Configuration file reader and writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    path: Utf8PathBuf,
}

impl ConfigStore {
    /// Creates a store for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the configuration file location.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Reads and decodes the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when the file does not exist,
    /// [`ConfigError::Malformed`] when it cannot be decoded, and
    /// [`ConfigError::Io`] on other read failures.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound {
                    path: self.path.clone(),
                });
            }
            Err(err) => return Err(ConfigError::io(err)),
        };
        serde_json::from_str(&contents).map_err(|err| ConfigError::Malformed {
            path: self.path.clone(),
            source: Arc::new(err),
        })
    }

    /// Writes `config` as indented JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be written.
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::io)?;
        }
        let contents = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::io(io::Error::other(err)))?;
        std::fs::write(&self.path, contents).map_err(ConfigError::io)?;
        info!(path = %self.path, provider = %config.provider, "configuration saved");
        Ok(())
    }
}
