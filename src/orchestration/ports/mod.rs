//! Ports consumed by the task orchestrator.

mod agents;

pub use agents::{PhaseAgents, TaskAgents};
