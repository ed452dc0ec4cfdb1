//! Orchestration services.

mod error;
mod orchestrator;

pub use error::{OrchestrationError, OrchestrationResult};
pub use orchestrator::{OrchestratorSettings, RunTaskRequest, TaskOrchestrator};
