//! Filesystem adapter implementations.

mod state_store;

pub use state_store::FileTaskStateStore;
