//! OpenAI-compatible HTTP completion provider.

mod provider;
mod wire;

pub use provider::{DEFAULT_REQUEST_TIMEOUT, OpenAiCompatibleProvider};
