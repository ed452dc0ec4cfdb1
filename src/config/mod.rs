//! Project configuration and on-disk layout.
//!
//! Configuration is loaded once at startup and passed by value into the
//! router, the workspace manager, and the orchestrator; nothing reads it
//! from global state.

pub mod adapters;
pub mod domain;

#[cfg(test)]
mod tests;
