//! In-memory adapter implementations for testing.

mod state_store;

pub use state_store::InMemoryTaskStateStore;
