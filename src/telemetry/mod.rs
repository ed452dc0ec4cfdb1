//! Tracing subscriber initialisation.
//!
//! Logs go to standard error and, when a [`LogFile`] is given, to a plain
//! text file under `.multiagent/logs/`. Task runs log to `<task_id>.log`;
//! other commands share a daily-rolling `multiagent.<date>.log`. The filter
//! comes from `MULTIAGENT_LOG` and defaults to `info`.

mod logs;

pub use logs::{latest_log, tail};

use crate::task::domain::TaskId;
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, InitError, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "MULTIAGENT_LOG";

/// Extension shared by every log file.
pub const LOG_EXTENSION: &str = "log";

const SESSION_LOG_PREFIX: &str = "multiagent";

/// Errors raised while installing the subscriber.
#[derive(Debug, Clone, Error)]
pub enum TelemetryError {
    /// The log file could not be opened.
    #[error("failed to open log file: {0}")]
    Appender(Arc<InitError>),

    /// The log directory could not be created.
    #[error("failed to create log directory: {0}")]
    Io(Arc<std::io::Error>),

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(String),
}

/// File destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    dir: Utf8PathBuf,
    prefix: String,
    daily: bool,
}

impl LogFile {
    /// Logs to `<dir>/<task_id>.log`, appending across resumes.
    #[must_use]
    pub fn for_task(dir: impl Into<Utf8PathBuf>, task_id: &TaskId) -> Self {
        Self {
            dir: dir.into(),
            prefix: task_id.as_str().to_owned(),
            daily: false,
        }
    }

    /// Logs to `<dir>/multiagent.<date>.log`, rolling daily.
    #[must_use]
    pub fn session(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: SESSION_LOG_PREFIX.to_owned(),
            daily: true,
        }
    }

    /// Returns the log directory.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Returns the path written to when the file does not roll.
    #[must_use]
    pub fn fixed_path(&self) -> Option<Utf8PathBuf> {
        (!self.daily).then(|| self.dir.join(format!("{}.{LOG_EXTENSION}", self.prefix)))
    }

    fn rotation(&self) -> Rotation {
        if self.daily {
            Rotation::DAILY
        } else {
            Rotation::NEVER
        }
    }
}

/// Installs the global subscriber.
///
/// Keep the returned guard alive until exit so buffered file output is
/// flushed.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the log file cannot be opened or a
/// subscriber is already installed.
pub fn init(file: Option<&LogFile>) -> Result<Option<WorkerGuard>, TelemetryError> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(true)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match file {
        Some(log_file) => {
            std::fs::create_dir_all(log_file.dir())
                .map_err(|err| TelemetryError::Io(Arc::new(err)))?;
            let appender = Builder::new()
                .rotation(log_file.rotation())
                .filename_prefix(log_file.prefix.as_str())
                .filename_suffix(LOG_EXTENSION)
                .build(log_file.dir())
                .map_err(|err| TelemetryError::Appender(Arc::new(err)))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|err| TelemetryError::Subscriber(err.to_string()))?;
    Ok(guard)
}
