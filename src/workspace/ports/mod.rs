//! Port contracts for workspace isolation.

mod manager;

pub use manager::{WorkspaceError, WorkspaceManager, WorkspaceResult};
