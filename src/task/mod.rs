//! Durable task records for the orchestration engine.
//!
//! A task record captures where a task stands in the phase state machine,
//! its run status, and the append-only history of QA iterations. Records are
//! written through the [`ports::TaskStateStore`] port so that a crashed
//! process always leaves the last fully written record behind as its resume
//! point. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
