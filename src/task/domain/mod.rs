//! Domain model for persisted task state.
//!
//! The task domain models the phase state machine, run status, and iteration
//! history of a task while keeping all storage concerns outside of the domain
//! boundary.

mod error;
mod ids;
mod phase;
mod task;

pub use error::{ParseTaskPhaseError, ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use phase::{Phase, TaskStatus};
pub use task::{FailureRecord, PhaseIteration, TaskRecord};
