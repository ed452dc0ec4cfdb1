//! Adapter implementations of the workspace manager port.

pub mod git;
pub mod memory;
