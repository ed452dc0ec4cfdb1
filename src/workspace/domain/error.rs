//! Domain errors for the workspace context.

use thiserror::Error;

/// Validation failures for workspace value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceDomainError {
    /// The value is not a usable branch name.
    #[error("invalid branch name: '{0}'")]
    InvalidBranchName(String),

    /// The artifact path is absolute or escapes the workspace.
    #[error("artifact path must stay inside the workspace: '{0}'")]
    InvalidArtifactPath(String),
}
