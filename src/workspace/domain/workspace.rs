//! Live workspace handle and artifact paths.

use super::{BranchName, WorkspaceDomainError};
use crate::task::domain::TaskId;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Directory inside a workspace that holds phase artifacts.
pub const ARTIFACT_DIR: &str = ".task";

/// Isolated working copy and branch owned by one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    task_id: TaskId,
    path: Utf8PathBuf,
    branch: BranchName,
}

impl Workspace {
    /// Creates a workspace handle for `task_id` checked out at `path`.
    #[must_use]
    pub fn new(task_id: TaskId, path: impl Into<Utf8PathBuf>) -> Self {
        let branch = BranchName::for_task(&task_id);
        Self {
            task_id,
            path: path.into(),
            branch,
        }
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the working directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the dedicated branch.
    #[must_use]
    pub const fn branch(&self) -> &BranchName {
        &self.branch
    }
}

/// Relative path of an artifact file inside a workspace.
///
/// # Examples
///
///     use multiagent::workspace::domain::ArtifactPath;
///
///     let path = ArtifactPath::new(".task/plan.md").expect("relative path");
///     assert_eq!(path.as_path(), ".task/plan.md");
///     assert!(ArtifactPath::new("../outside").is_err());
///     assert!(ArtifactPath::new("/etc/passwd").is_err());
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactPath(Utf8PathBuf);

impl ArtifactPath {
    /// Validates that `value` is a non-empty relative path without parent
    /// traversal.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::InvalidArtifactPath`] otherwise.
    pub fn new(value: impl Into<Utf8PathBuf>) -> Result<Self, WorkspaceDomainError> {
        let path = value.into();
        let mut has_file_component = false;
        for component in path.components() {
            match component {
                Utf8Component::Normal(_) => has_file_component = true,
                Utf8Component::CurDir => {}
                Utf8Component::ParentDir | Utf8Component::RootDir | Utf8Component::Prefix(_) => {
                    return Err(WorkspaceDomainError::InvalidArtifactPath(path.as_str().to_owned()));
                }
            }
        }
        if !has_file_component {
            return Err(WorkspaceDomainError::InvalidArtifactPath(path.as_str().to_owned()));
        }
        Ok(Self(path))
    }

    /// Returns the artifact file for a named phase output, such as `plan`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::InvalidArtifactPath`] when `name` is
    /// not a plain file stem.
    pub fn phase_output(name: &str) -> Result<Self, WorkspaceDomainError> {
        if name.contains('/') || name.contains('\\') {
            return Err(WorkspaceDomainError::InvalidArtifactPath(name.to_owned()));
        }
        Self::new(Utf8Path::new(ARTIFACT_DIR).join(format!("{name}.md")))
    }

    /// Returns the path relative to the workspace root.
    #[must_use]
    pub fn as_path(&self) -> &Utf8Path {
        &self.0
    }
}
