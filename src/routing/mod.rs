//! Tiered model routing with fallback and bounded retry.
//!
//! Every model call goes through a [`services::ModelRouter`], which maps a
//! capability tier (or a role with its own chain) to an ordered fallback
//! chain of model identifiers. Authentication, rate-limit, and upstream
//! server failures advance the chain; other failures retry the same model.
//! Chain positions are session-scoped and never persisted.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
