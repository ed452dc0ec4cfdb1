//! Documents each phase leaves in the workspace.

use crate::task::domain::{Phase, TaskId};
use crate::workspace::domain::{ArtifactPath, WorkspaceDomainError};
use std::fmt;

/// Output document of a phase, stored under `.task/` in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseArtifact {
    /// The architect's implementation plan.
    Plan,
    /// The reviewed implementation.
    Implementation,
    /// The reviewed test suite.
    Tests,
    /// Implementation and tests as approved by the final review.
    Review,
}

impl PhaseArtifact {
    /// Returns the file stem of the artifact.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Implementation => "implementation",
            Self::Tests => "tests",
            Self::Review => "review",
        }
    }

    /// Returns the artifact a phase produces, if any.
    #[must_use]
    pub const fn for_phase(phase: Phase) -> Option<Self> {
        match phase {
            Phase::Planning => Some(Self::Plan),
            Phase::Implementation => Some(Self::Implementation),
            Phase::Testing => Some(Self::Tests),
            Phase::Review => Some(Self::Review),
            Phase::Merge | Phase::Done | Phase::Failed => None,
        }
    }

    /// Returns the workspace-relative location, `.task/<stem>.md`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError`] if the location is rejected, which
    /// the fixed stems never are.
    pub fn path(self) -> Result<ArtifactPath, WorkspaceDomainError> {
        ArtifactPath::phase_output(self.as_str())
    }

    /// Returns the checkpoint commit message recording this artifact.
    ///
    /// # Examples
    ///
    ///     use multiagent::orchestration::domain::PhaseArtifact;
    ///     use multiagent::task::domain::TaskId;
    ///
    ///     let task_id = TaskId::new("login-1").expect("valid id");
    ///     assert_eq!(
    ///         PhaseArtifact::Plan.checkpoint_message(&task_id),
    ///         "checkpoint: login-1 plan"
    ///     );
    #[must_use]
    pub fn checkpoint_message(self, task_id: &TaskId) -> String {
        checkpoint_message(task_id, self)
    }
}

/// Returns the checkpoint commit message for `step` of `task_id`.
#[must_use]
pub fn checkpoint_message(task_id: &TaskId, step: impl fmt::Display) -> String {
    format!("checkpoint: {task_id} {step}")
}

impl fmt::Display for PhaseArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
