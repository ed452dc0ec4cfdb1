//! Phase-driven task orchestration.
//!
//! The [`services::TaskOrchestrator`] walks a task through planning,
//! implementation, testing, review, and merge. Every phase entry is
//! persisted through the task state store before its work starts, so a
//! resumed task re-enters the phase it was in. Implementation, testing, and
//! the final review each drive a QA loop; a non-approving verdict leaves the
//! task blocked rather than failed.
//!
//! - Domain types in [`domain`]
//! - The agent port in [`ports`]
//! - Router-backed and scripted agents in [`adapters`]
//! - The orchestrator in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
