//! Task record aggregate and its lifecycle mutations.

use super::{Phase, TaskDomainError, TaskId, TaskStatus};
use crate::review::domain::IterationRecord;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Iteration record tagged with the phase whose QA loop produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseIteration {
    /// Phase the iteration belongs to.
    pub phase: Phase,
    /// Iteration details reported by the QA loop.
    #[serde(flatten)]
    pub record: IterationRecord,
}

/// Details of the fatal error that moved a task into [`Phase::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Phase that was executing when the error occurred.
    pub phase: Phase,
    /// Human-readable error description.
    pub message: String,
}

/// Durable record of a task's progress through the phase state machine.
///
/// The record is owned exclusively by the orchestrator driving the task.
/// Timestamps stay unset until the first save, when the state store stamps
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    task_id: TaskId,
    spec_name: String,
    phase: Phase,
    status: TaskStatus,
    iteration: u32,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    worktree_path: Option<Utf8PathBuf>,
    #[serde(default)]
    branch_name: Option<String>,
    #[serde(default)]
    history: Vec<PhaseIteration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure: Option<FailureRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_iterations: Option<u32>,
}

impl TaskRecord {
    /// Creates a pending record in the planning phase.
    #[must_use]
    pub fn new(task_id: TaskId, spec_name: impl Into<String>) -> Self {
        Self {
            task_id,
            spec_name: spec_name.into(),
            phase: Phase::Planning,
            status: TaskStatus::Pending,
            iteration: 0,
            created_at: None,
            updated_at: None,
            worktree_path: None,
            branch_name: None,
            history: Vec::new(),
            failure: None,
            max_iterations: None,
        }
    }

    /// Pins the QA iteration cap used whenever this task is driven.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the name of the specification the task executes.
    #[must_use]
    pub fn spec_name(&self) -> &str {
        &self.spec_name
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the current run status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the iteration counter of the current phase.
    #[must_use]
    pub const fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Returns the QA iteration cap pinned when the task was started, if any.
    #[must_use]
    pub const fn max_iterations(&self) -> Option<u32> {
        self.max_iterations
    }

    /// Returns the creation timestamp, if the record has been saved.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the latest save timestamp, if the record has been saved.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns the workspace directory, once one has been attached.
    #[must_use]
    pub fn worktree_path(&self) -> Option<&Utf8Path> {
        self.worktree_path.as_deref()
    }

    /// Returns the workspace branch, once one has been attached.
    #[must_use]
    pub fn branch_name(&self) -> Option<&str> {
        self.branch_name.as_deref()
    }

    /// Returns the append-only iteration history.
    #[must_use]
    pub fn history(&self) -> &[PhaseIteration] {
        &self.history
    }

    /// Returns the failure details when the task has failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&FailureRecord> {
        self.failure.as_ref()
    }

    /// Returns the issues reported by the most recent iteration.
    #[must_use]
    pub fn last_issues(&self) -> &[String] {
        self.history
            .last()
            .map_or(&[][..], |entry| entry.record.issues.as_slice())
    }

    /// Stamps save metadata onto the record.
    ///
    /// `updated_at` always moves to `timestamp`; `created_at` is only set when
    /// absent.
    pub fn stamp(&mut self, timestamp: DateTime<Utc>) {
        self.updated_at = Some(timestamp);
        self.created_at.get_or_insert(timestamp);
    }

    /// Records the workspace the task executes in.
    pub fn attach_workspace(&mut self, path: impl Into<Utf8PathBuf>, branch: impl Into<String>) {
        self.worktree_path = Some(path.into());
        self.branch_name = Some(branch.into());
    }

    /// Moves the task into `phase` and marks it running.
    ///
    /// Re-entering the current phase is permitted so that a resumed task can
    /// restart interrupted phase work; its iteration counter is preserved.
    /// Entering a new phase resets the counter.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskTerminated`] when the task has already
    /// finished, or [`TaskDomainError::InvalidPhaseTransition`] when the state
    /// machine forbids the move.
    pub fn enter_phase(&mut self, phase: Phase) -> Result<(), TaskDomainError> {
        self.ensure_not_terminated()?;
        if phase != self.phase {
            if !self.phase.can_transition_to(phase) {
                return Err(TaskDomainError::InvalidPhaseTransition {
                    task_id: self.task_id.clone(),
                    from: self.phase,
                    to: phase,
                });
            }
            self.phase = phase;
            self.iteration = 0;
        }
        self.status = if phase == Phase::Done {
            TaskStatus::Done
        } else {
            TaskStatus::Running
        };
        Ok(())
    }

    /// Appends an iteration of the current phase to the history.
    ///
    /// The stored index is renumbered to the phase counter so iterations keep
    /// counting across resumed runs of the same phase.
    pub fn record_iteration(&mut self, mut record: IterationRecord) {
        self.iteration = self.iteration.saturating_add(1);
        record.iteration = self.iteration;
        self.history.push(PhaseIteration {
            phase: self.phase,
            record,
        });
    }

    /// Marks the task as waiting for operator intervention.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskTerminated`] when the task has already
    /// finished.
    pub fn block(&mut self) -> Result<(), TaskDomainError> {
        self.ensure_not_terminated()?;
        self.status = TaskStatus::Blocked;
        Ok(())
    }

    /// Moves the task into the absorbing failed state.
    ///
    /// The phase that was executing is preserved in [`Self::failure`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskTerminated`] when the task has already
    /// finished.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), TaskDomainError> {
        self.ensure_not_terminated()?;
        self.failure = Some(FailureRecord {
            phase: self.phase,
            message: message.into(),
        });
        self.phase = Phase::Failed;
        self.status = TaskStatus::Failed;
        Ok(())
    }

    fn ensure_not_terminated(&self) -> Result<(), TaskDomainError> {
        if self.phase.is_terminal() {
            return Err(TaskDomainError::TaskTerminated {
                task_id: self.task_id.clone(),
                phase: self.phase,
            });
        }
        Ok(())
    }
}
