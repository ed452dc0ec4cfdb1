//! Orchestration domain types.

mod artifact;
mod report;

pub use artifact::{PhaseArtifact, checkpoint_message};
pub use report::TaskReport;
