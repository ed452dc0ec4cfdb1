//! Port contracts for persisted task state.
//!
//! Ports define infrastructure-agnostic interfaces used by the orchestrator.

pub mod state_store;

pub use state_store::{TaskStateError, TaskStateResult, TaskStateStore};
