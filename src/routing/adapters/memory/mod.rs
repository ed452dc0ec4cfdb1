//! Scripted completion provider for routing and orchestration tests.

mod scripted;

pub use scripted::{ScriptedCompletionProvider, ScriptedReply};
