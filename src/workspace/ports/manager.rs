//! Workspace manager port.

use crate::task::domain::TaskId;
use crate::workspace::domain::{
    ArtifactPath, BranchName, Workspace, WorkspaceDomainError, WorktreeEntry,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workspace operations.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Isolation backend managing one workspace per task.
///
/// Mutating operations are never retried here; retry policy belongs to the
/// caller.
#[async_trait]
pub trait WorkspaceManager: Send + Sync {
    /// Creates the branch `task/<task_id>` from `base_branch` and checks it
    /// out into a dedicated working directory.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::BranchExists`] when the task branch already
    /// exists, [`WorkspaceError::BaseBranchMissing`] when `base_branch` does
    /// not exist, or a command error when the backend fails.
    async fn create(&self, task_id: &TaskId, base_branch: &BranchName)
    -> WorkspaceResult<Workspace>;

    /// Returns the live workspace of `task_id`, if its directory still
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns a command error when the backend cannot be queried.
    async fn find(&self, task_id: &TaskId) -> WorkspaceResult<Option<Workspace>>;

    /// Stages every change in `workspace` and commits it under `message`.
    ///
    /// Returns `false` without committing when the working copy is clean.
    ///
    /// # Errors
    ///
    /// Returns a command error when staging or committing fails.
    async fn checkpoint(&self, workspace: &Workspace, message: &str) -> WorkspaceResult<bool>;

    /// Checks out `target` and merges the task branch into it.
    ///
    /// With `no_commit` the merge is staged but left uncommitted for
    /// inspection. At most one merge-back runs at a time per manager.
    ///
    /// # Errors
    ///
    /// Returns a command error when the checkout or merge fails.
    async fn merge_back(
        &self,
        task_id: &TaskId,
        target: &BranchName,
        no_commit: bool,
    ) -> WorkspaceResult<()>;

    /// Removes the working directory of `task_id` and, with
    /// `delete_branch`, its branch.
    ///
    /// # Errors
    ///
    /// Returns a command error when removal fails.
    async fn cleanup(&self, task_id: &TaskId, delete_branch: bool) -> WorkspaceResult<()>;

    /// Lists every worktree known to the backend.
    ///
    /// # Errors
    ///
    /// Returns a command error when the listing cannot be produced.
    async fn list(&self) -> WorkspaceResult<Vec<WorktreeEntry>>;

    /// Writes `contents` to `path` inside `workspace`, creating parent
    /// directories.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Io`] when the write fails.
    async fn write_artifact(
        &self,
        workspace: &Workspace,
        path: &ArtifactPath,
        contents: &str,
    ) -> WorkspaceResult<()>;

    /// Reads `path` inside `workspace`, returning `None` when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::Io`] when the read fails.
    async fn read_artifact(
        &self,
        workspace: &Workspace,
        path: &ArtifactPath,
    ) -> WorkspaceResult<Option<String>>;
}

/// Errors returned by workspace managers.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceError {
    /// A version-control command exited unsuccessfully.
    #[error("`{command}` failed with status {status}: {stderr}")]
    CommandFailed {
        /// Command line that failed.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// A version-control command exceeded its time budget.
    #[error("`{command}` timed out after {timeout_secs}s")]
    TimedOut {
        /// Command line that timed out.
        command: String,
        /// Budget in seconds.
        timeout_secs: u64,
    },

    /// The task branch already exists.
    #[error("branch {0} already exists")]
    BranchExists(BranchName),

    /// The requested base branch does not exist.
    #[error("base branch {0} does not exist")]
    BaseBranchMissing(BranchName),

    /// No live workspace exists for the task.
    #[error("no workspace exists for task {0}")]
    NotFound(TaskId),

    /// A workspace value object was invalid.
    #[error(transparent)]
    Domain(#[from] WorkspaceDomainError),

    /// Filesystem or process-spawn failure.
    #[error("workspace I/O error: {0}")]
    Io(Arc<std::io::Error>),
}

impl WorkspaceError {
    /// Wraps an I/O failure.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }

    /// Returns whether the failure was a timeout, which callers may retry.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}
