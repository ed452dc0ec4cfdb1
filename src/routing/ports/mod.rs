//! Port contracts for completion providers.

mod provider;

pub use provider::CompletionProvider;
