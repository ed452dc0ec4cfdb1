//! Error types for task domain validation and parsing.

use super::{Phase, TaskId};
use thiserror::Error;

/// Errors returned while constructing or mutating task records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is empty or contains characters that are unsafe
    /// for file names and branch names.
    #[error("invalid task identifier '{0}', expected [A-Za-z0-9._-] without a leading dot")]
    InvalidTaskId(String),

    /// The phase state machine does not permit the requested transition.
    #[error("invalid phase transition for task {task_id}: {from} -> {to}")]
    InvalidPhaseTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Phase the task is currently in.
        from: Phase,
        /// Requested target phase.
        to: Phase,
    },

    /// The task has already reached a terminal phase.
    #[error("task {task_id} is already {phase} and cannot change")]
    TaskTerminated {
        /// Task that was mutated after termination.
        task_id: TaskId,
        /// Terminal phase the task is in.
        phase: Phase,
    },
}

/// Error returned while parsing task phases from persistence or user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task phase: {0}")]
pub struct ParseTaskPhaseError(pub String);

/// Error returned while parsing task statuses from persistence or user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
