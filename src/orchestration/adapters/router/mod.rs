//! Agents backed by the model router.

mod agents;
mod prompts;

pub use agents::RouterTaskAgents;
pub use prompts::system_prompt;
