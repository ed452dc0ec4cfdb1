//! In-memory adapter implementations for testing.

mod scripted;

pub use scripted::ScriptedTaskAgents;
