//! Adapter implementations of the task agents port.
//!
//! - [`router::RouterTaskAgents`]: prompts each role's model through the
//!   model router
//! - [`memory::ScriptedTaskAgents`]: canned artifacts and verdicts for tests

pub mod memory;
pub mod router;
