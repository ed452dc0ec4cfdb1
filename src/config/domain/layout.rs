//! Locations of project files relative to the project root.

use camino::{Utf8Path, Utf8PathBuf};
use std::io;

const STATE_DIR: &str = ".multiagent";

/// Resolves the `.multiagent/` tree and the `specs/` catalogue of a project.
///
/// # Examples
///
///     use multiagent::config::domain::ProjectLayout;
///
///     let layout = ProjectLayout::new("/work/app");
///     assert_eq!(layout.config_path(), "/work/app/.multiagent/config.json");
///     assert_eq!(layout.specs_dir(), "/work/app/specs");
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: Utf8PathBuf,
}

impl ProjectLayout {
    /// Creates a layout for the project at `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the project root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the `.multiagent` directory.
    #[must_use]
    pub fn state_dir(&self) -> Utf8PathBuf {
        self.root.join(STATE_DIR)
    }

    /// Returns the configuration file path.
    #[must_use]
    pub fn config_path(&self) -> Utf8PathBuf {
        self.state_dir().join("config.json")
    }

    /// Returns the directory of persisted task records.
    #[must_use]
    pub fn tasks_dir(&self) -> Utf8PathBuf {
        self.state_dir().join("tasks")
    }

    /// Returns the default directory for task worktrees.
    #[must_use]
    pub fn worktrees_dir(&self) -> Utf8PathBuf {
        self.state_dir().join("worktrees")
    }

    /// Returns the directory of log files.
    #[must_use]
    pub fn logs_dir(&self) -> Utf8PathBuf {
        self.state_dir().join("logs")
    }

    /// Returns the specification catalogue directory.
    #[must_use]
    pub fn specs_dir(&self) -> Utf8PathBuf {
        self.root.join("specs")
    }

    /// Creates the task, worktree, and log directories.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when a directory cannot be created.
    pub fn ensure(&self) -> io::Result<()> {
        for dir in [self.tasks_dir(), self.worktrees_dir(), self.logs_dir()] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}
