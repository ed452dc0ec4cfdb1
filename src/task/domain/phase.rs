//! Phase state machine and run status for tasks.

use super::{ParseTaskPhaseError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Orchestration phase of a task.
///
/// Tasks advance strictly forward through
/// `planning -> implementation -> testing -> review -> merge -> done`.
/// `failed` is an absorbing state reachable from every non-terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The architect produces an implementation plan.
    Planning,
    /// Coders produce the artifact and the QA loop iterates on it.
    Implementation,
    /// Tests are written for the artifact and iterated by the QA loop.
    Testing,
    /// A final QA pass runs against the combined artifact set.
    Review,
    /// The task branch is staged into the integration branch.
    Merge,
    /// The merge has been staged; the task is complete.
    Done,
    /// A fatal error aborted the task.
    Failed,
}

impl Phase {
    /// Every phase in state-machine order.
    pub const ALL: [Self; 7] = [
        Self::Planning,
        Self::Implementation,
        Self::Testing,
        Self::Review,
        Self::Merge,
        Self::Done,
        Self::Failed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Implementation => "implementation",
            Self::Testing => "testing",
            Self::Review => "review",
            Self::Merge => "merge",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns the phase that follows a successful pass through this one.
    ///
    /// Terminal phases have no successor.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Planning => Some(Self::Implementation),
            Self::Implementation => Some(Self::Testing),
            Self::Testing => Some(Self::Review),
            Self::Review => Some(Self::Merge),
            Self::Merge => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    /// Returns whether this phase ends the task.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns whether the state machine permits moving to `target`.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == Self::Failed || self.successor() == Some(target)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Phase {
    type Error = ParseTaskPhaseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == normalized)
            .ok_or_else(|| ParseTaskPhaseError(value.to_owned()))
    }
}

/// Run status of a task.
///
/// `blocked` marks a QA verdict that needs operator intervention and is
/// deliberately distinct from `failed`, which marks a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The record exists but phase work has not started.
    Pending,
    /// Phase work is in progress.
    Running,
    /// The QA loop stopped without approval.
    Blocked,
    /// The task completed successfully.
    Done,
    /// A fatal error aborted the task.
    Failed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Blocked => "blocked",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Returns whether the status ends the task.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "blocked" => Ok(Self::Blocked),
            "done" => Ok(Self::Done),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
