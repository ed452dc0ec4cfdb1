//! Domain types for workspaces and worktree listings.

mod branch;
mod error;
mod listing;
mod workspace;

pub use branch::{BranchName, DEFAULT_BASE_BRANCH, TASK_BRANCH_PREFIX};
pub use error::WorkspaceDomainError;
pub use listing::{WorktreeEntry, parse_worktree_porcelain};
pub use workspace::{ARTIFACT_DIR, ArtifactPath, Workspace};
