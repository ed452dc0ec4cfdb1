//! Per-task workspace isolation.
//!
//! Every task executes inside its own version-controlled working copy on a
//! dedicated `task/<task_id>` branch. Workspaces share the base repository's
//! object store, are checkpointed after each phase step, and are only
//! destroyed through an explicit cleanup. Merge-back into the shared
//! integration branch stages the result without committing it.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
