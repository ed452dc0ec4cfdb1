//! Git worktree backed workspaces.

mod command;
mod manager;

pub use command::{DEFAULT_GIT_TIMEOUT, GitRunner};
pub use manager::GitWorkspaceManager;
