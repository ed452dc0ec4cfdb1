//! In-memory workspace manager for orchestration tests.

mod manager;

pub use manager::{InMemoryWorkspaceManager, MergeRecord};
