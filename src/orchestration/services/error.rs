//! Errors raised while driving a task.

use crate::orchestration::domain::PhaseArtifact;
use crate::review::{ports::AgentError, services::QaLoopError};
use crate::specification::{domain::SpecificationDomainError, ports::SpecificationError};
use crate::task::{
    domain::{TaskDomainError, TaskId},
    ports::TaskStateError,
};
use crate::workspace::{domain::WorkspaceDomainError, ports::WorkspaceError};
use thiserror::Error;

/// Result type for orchestration operations.
pub type OrchestrationResult<T> = Result<T, OrchestrationError>;

/// Service-level errors for task orchestration.
///
/// Blocked tasks are not errors; they are reported through
/// [`crate::orchestration::domain::TaskReport`].
#[derive(Debug, Clone, Error)]
pub enum OrchestrationError {
    /// No task record exists for the identifier.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A task record already exists for the identifier.
    #[error("task already exists: {0}")]
    TaskExists(TaskId),

    /// The task's workspace was destroyed while its record survived.
    #[error("workspace of task {0} no longer exists; clean up and start a new run")]
    WorkspaceMissing(TaskId),

    /// A phase needs the output of an earlier phase that is not in the
    /// workspace.
    #[error("task {task_id} is missing its {artifact} artifact")]
    ArtifactMissing {
        /// Task whose workspace was inspected.
        task_id: TaskId,
        /// Artifact that was expected.
        artifact: PhaseArtifact,
    },

    /// Loading the specification failed.
    #[error(transparent)]
    Specification(#[from] SpecificationError),

    /// The recorded specification name is invalid.
    #[error(transparent)]
    SpecificationName(#[from] SpecificationDomainError),

    /// Reading or writing the task record failed.
    #[error(transparent)]
    State(#[from] TaskStateError),

    /// The task state machine rejected a transition.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// A workspace operation failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// A workspace path was rejected.
    #[error(transparent)]
    WorkspaceDomain(#[from] WorkspaceDomainError),

    /// An authoring agent failed.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// A QA loop aborted.
    #[error(transparent)]
    QaLoop(#[from] QaLoopError),
}
