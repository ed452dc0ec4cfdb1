//! In-memory workspace manager.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

use crate::task::domain::TaskId;
use crate::workspace::{
    domain::{ArtifactPath, BranchName, Workspace, WorktreeEntry},
    ports::{WorkspaceError, WorkspaceManager, WorkspaceResult},
};

/// Merge-back request observed by [`InMemoryWorkspaceManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRecord {
    /// Task whose branch was merged.
    pub task_id: TaskId,
    /// Branch merged into.
    pub target: BranchName,
    /// Whether the merge was staged without committing.
    pub no_commit: bool,
}

#[derive(Debug, Default)]
struct LiveWorkspace {
    files: BTreeMap<ArtifactPath, String>,
    dirty: bool,
    checkpoints: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    branches: BTreeSet<BranchName>,
    live: BTreeMap<TaskId, LiveWorkspace>,
    merges: Vec<MergeRecord>,
}

/// Thread-safe workspace manager simulating branches and working copies.
///
/// Artifacts are kept in memory and checkpoints are recorded as commit
/// messages, so tests can assert on workspace history without git.
#[derive(Debug, Clone)]
pub struct InMemoryWorkspaceManager {
    base: Utf8PathBuf,
    state: Arc<RwLock<State>>,
}

impl Default for InMemoryWorkspaceManager {
    fn default() -> Self {
        Self::new("/workspaces")
    }
}

impl InMemoryWorkspaceManager {
    /// Creates a manager whose only branch is `main`.
    #[must_use]
    pub fn new(base: impl Into<Utf8PathBuf>) -> Self {
        let mut state = State::default();
        state.branches.insert(BranchName::main());
        Self {
            base: base.into(),
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Adds an existing branch that workspaces can be created from.
    #[must_use]
    pub fn with_branch(self, branch: BranchName) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.branches.insert(branch);
        }
        self
    }

    /// Returns the base directory workspace paths are reported under.
    #[must_use]
    pub fn base(&self) -> &Utf8Path {
        &self.base
    }

    /// Returns the checkpoint messages committed in the workspace of
    /// `task_id`, oldest first.
    #[must_use]
    pub fn checkpoints(&self, task_id: &TaskId) -> Vec<String> {
        self.state
            .read()
            .map(|state| {
                state
                    .live
                    .get(task_id)
                    .map(|live| live.checkpoints.clone())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    /// Returns every merge-back performed, oldest first.
    #[must_use]
    pub fn merges(&self) -> Vec<MergeRecord> {
        self.state
            .read()
            .map(|state| state.merges.clone())
            .unwrap_or_default()
    }

    /// Drops the working copy of `task_id` while keeping its branch,
    /// simulating a directory removed behind the manager's back.
    pub fn lose_directory(&self, task_id: &TaskId) {
        if let Ok(mut state) = self.state.write() {
            state.live.remove(task_id);
        }
    }

    fn path_for(&self, task_id: &TaskId) -> Utf8PathBuf {
        self.base.join(task_id.as_str())
    }
}

fn lock_error(err: impl std::fmt::Display) -> WorkspaceError {
    WorkspaceError::io(std::io::Error::other(err.to_string()))
}

fn missing(task_id: &TaskId) -> WorkspaceError {
    WorkspaceError::NotFound(task_id.clone())
}

#[async_trait]
impl WorkspaceManager for InMemoryWorkspaceManager {
    async fn create(
        &self,
        task_id: &TaskId,
        base_branch: &BranchName,
    ) -> WorkspaceResult<Workspace> {
        let mut state = self.state.write().map_err(lock_error)?;
        let workspace = Workspace::new(task_id.clone(), self.path_for(task_id));
        if state.branches.contains(workspace.branch()) {
            return Err(WorkspaceError::BranchExists(workspace.branch().clone()));
        }
        if !state.branches.contains(base_branch) {
            return Err(WorkspaceError::BaseBranchMissing(base_branch.clone()));
        }
        state.branches.insert(workspace.branch().clone());
        state.live.insert(task_id.clone(), LiveWorkspace::default());
        Ok(workspace)
    }

    async fn find(&self, task_id: &TaskId) -> WorkspaceResult<Option<Workspace>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .live
            .contains_key(task_id)
            .then(|| Workspace::new(task_id.clone(), self.path_for(task_id))))
    }

    async fn checkpoint(&self, workspace: &Workspace, message: &str) -> WorkspaceResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        let live = state
            .live
            .get_mut(workspace.task_id())
            .ok_or_else(|| missing(workspace.task_id()))?;
        if !live.dirty {
            return Ok(false);
        }
        live.dirty = false;
        live.checkpoints.push(message.to_owned());
        Ok(true)
    }

    async fn merge_back(
        &self,
        task_id: &TaskId,
        target: &BranchName,
        no_commit: bool,
    ) -> WorkspaceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.branches.contains(&BranchName::for_task(task_id)) {
            return Err(missing(task_id));
        }
        if !state.branches.contains(target) {
            return Err(WorkspaceError::BaseBranchMissing(target.clone()));
        }
        state.merges.push(MergeRecord {
            task_id: task_id.clone(),
            target: target.clone(),
            no_commit,
        });
        Ok(())
    }

    async fn cleanup(&self, task_id: &TaskId, delete_branch: bool) -> WorkspaceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let branch = BranchName::for_task(task_id);
        let had_directory = state.live.remove(task_id).is_some();
        let had_branch = state.branches.contains(&branch);
        if !had_directory && !had_branch {
            return Err(missing(task_id));
        }
        if delete_branch {
            state.branches.remove(&branch);
        }
        Ok(())
    }

    async fn list(&self) -> WorkspaceResult<Vec<WorktreeEntry>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .live
            .keys()
            .map(|task_id| {
                WorktreeEntry::new(self.path_for(task_id))
                    .with_branch(BranchName::for_task(task_id).to_ref())
            })
            .collect())
    }

    async fn write_artifact(
        &self,
        workspace: &Workspace,
        path: &ArtifactPath,
        contents: &str,
    ) -> WorkspaceResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let live = state
            .live
            .get_mut(workspace.task_id())
            .ok_or_else(|| missing(workspace.task_id()))?;
        let previous = live.files.insert(path.clone(), contents.to_owned());
        if previous.as_deref() != Some(contents) {
            live.dirty = true;
        }
        Ok(())
    }

    async fn read_artifact(
        &self,
        workspace: &Workspace,
        path: &ArtifactPath,
    ) -> WorkspaceResult<Option<String>> {
        let state = self.state.read().map_err(lock_error)?;
        let live = state
            .live
            .get(workspace.task_id())
            .ok_or_else(|| missing(workspace.task_id()))?;
        Ok(live.files.get(path).cloned())
    }
}
