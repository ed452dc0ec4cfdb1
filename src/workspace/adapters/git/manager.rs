//! Workspace manager backed by `git worktree`.

use super::GitRunner;
use crate::task::domain::TaskId;
use crate::workspace::{
    domain::{ArtifactPath, BranchName, Workspace, WorktreeEntry, parse_worktree_porcelain},
    ports::{WorkspaceError, WorkspaceManager, WorkspaceResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Workspace manager creating one git worktree per task.
///
/// Worktrees live under `<worktree_base>/<task_id>`; a relative base is
/// resolved against the repository root, which must be absolute. Merge-back
/// operations are serialized through a lock shared by clones of the manager.
#[derive(Debug, Clone)]
pub struct GitWorkspaceManager {
    repo_root: Utf8PathBuf,
    worktree_base: Utf8PathBuf,
    git: GitRunner,
    merge_lock: Arc<Mutex<()>>,
}

impl GitWorkspaceManager {
    /// Creates a manager for the repository at `repo_root`.
    #[must_use]
    pub fn new(repo_root: impl Into<Utf8PathBuf>, worktree_base: impl AsRef<Utf8Path>) -> Self {
        let root = repo_root.into();
        let base = root.join(worktree_base.as_ref());
        Self {
            repo_root: root,
            worktree_base: base,
            git: GitRunner::default(),
            merge_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Sets the time budget for each git invocation.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.git = GitRunner::new(timeout);
        self
    }

    /// Returns the repository root.
    #[must_use]
    pub fn repo_root(&self) -> &Utf8Path {
        &self.repo_root
    }

    /// Returns the directory the worktree of `task_id` is checked out into.
    #[must_use]
    pub fn worktree_path(&self, task_id: &TaskId) -> Utf8PathBuf {
        self.worktree_base.join(task_id.as_str())
    }

    async fn branch_exists(&self, branch: &BranchName) -> WorkspaceResult<bool> {
        let reference = branch.to_ref();
        self.git
            .probe(
                &self.repo_root,
                &["rev-parse", "--verify", "--quiet", &reference],
            )
            .await
    }
}

async fn path_exists(path: &Utf8Path) -> WorkspaceResult<bool> {
    tokio::fs::try_exists(path)
        .await
        .map_err(WorkspaceError::io)
}

#[async_trait]
impl WorkspaceManager for GitWorkspaceManager {
    async fn create(
        &self,
        task_id: &TaskId,
        base_branch: &BranchName,
    ) -> WorkspaceResult<Workspace> {
        let workspace = Workspace::new(task_id.clone(), self.worktree_path(task_id));
        if self.branch_exists(workspace.branch()).await? {
            return Err(WorkspaceError::BranchExists(workspace.branch().clone()));
        }
        if !self.branch_exists(base_branch).await? {
            return Err(WorkspaceError::BaseBranchMissing(base_branch.clone()));
        }

        tokio::fs::create_dir_all(&self.worktree_base)
            .await
            .map_err(WorkspaceError::io)?;
        self.git
            .run(
                &self.repo_root,
                &[
                    "worktree",
                    "add",
                    "-b",
                    workspace.branch().as_str(),
                    workspace.path().as_str(),
                    base_branch.as_str(),
                ],
            )
            .await?;
        info!(
            task_id = %task_id,
            path = %workspace.path(),
            branch = %workspace.branch(),
            "workspace created"
        );
        Ok(workspace)
    }

    async fn find(&self, task_id: &TaskId) -> WorkspaceResult<Option<Workspace>> {
        for entry in self.list().await? {
            if entry.task_id().as_ref() != Some(task_id) {
                continue;
            }
            if path_exists(entry.path()).await? {
                return Ok(Some(Workspace::new(task_id.clone(), entry.path())));
            }
        }
        Ok(None)
    }

    async fn checkpoint(&self, workspace: &Workspace, message: &str) -> WorkspaceResult<bool> {
        self.git.run(workspace.path(), &["add", "-A"]).await?;
        let pending = self
            .git
            .run(workspace.path(), &["status", "--porcelain"])
            .await?;
        if pending.trim().is_empty() {
            return Ok(false);
        }
        self.git
            .run(workspace.path(), &["commit", "--quiet", "-m", message])
            .await?;
        info!(task_id = %workspace.task_id(), message, "workspace checkpoint committed");
        Ok(true)
    }

    async fn merge_back(
        &self,
        task_id: &TaskId,
        target: &BranchName,
        no_commit: bool,
    ) -> WorkspaceResult<()> {
        let branch = BranchName::for_task(task_id);
        let _merge_guard = self.merge_lock.lock().await;

        self.git
            .run(&self.repo_root, &["checkout", target.as_str()])
            .await?;
        let mut args = vec!["merge"];
        if no_commit {
            args.extend(["--no-ff", "--no-commit"]);
        }
        args.push(branch.as_str());
        self.git.run(&self.repo_root, &args).await?;
        info!(
            task_id = %task_id,
            target = %target,
            staged_only = no_commit,
            "task branch merged back"
        );
        Ok(())
    }

    async fn cleanup(&self, task_id: &TaskId, delete_branch: bool) -> WorkspaceResult<()> {
        let path = self.worktree_path(task_id);
        let branch = BranchName::for_task(task_id);
        let has_directory = path_exists(&path).await?;
        let has_branch = self.branch_exists(&branch).await?;
        if !has_directory && !has_branch {
            return Err(WorkspaceError::NotFound(task_id.clone()));
        }

        if has_directory {
            self.git
                .run(
                    &self.repo_root,
                    &["worktree", "remove", "--force", path.as_str()],
                )
                .await?;
        }
        self.git.run(&self.repo_root, &["worktree", "prune"]).await?;
        if delete_branch && has_branch {
            self.git
                .run(&self.repo_root, &["branch", "-D", branch.as_str()])
                .await?;
        }
        info!(task_id = %task_id, delete_branch, "workspace removed");
        Ok(())
    }

    async fn list(&self) -> WorkspaceResult<Vec<WorktreeEntry>> {
        let porcelain = self
            .git
            .run(&self.repo_root, &["worktree", "list", "--porcelain"])
            .await?;
        Ok(parse_worktree_porcelain(&porcelain))
    }

    async fn write_artifact(
        &self,
        workspace: &Workspace,
        path: &ArtifactPath,
        contents: &str,
    ) -> WorkspaceResult<()> {
        let target = workspace.path().join(path.as_path());
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(WorkspaceError::io)?;
        }
        tokio::fs::write(&target, contents)
            .await
            .map_err(WorkspaceError::io)
    }

    async fn read_artifact(
        &self,
        workspace: &Workspace,
        path: &ArtifactPath,
    ) -> WorkspaceResult<Option<String>> {
        let target = workspace.path().join(path.as_path());
        match tokio::fs::read_to_string(&target).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(WorkspaceError::io(err)),
        }
    }
}
