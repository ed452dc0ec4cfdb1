//! Named task specifications.
//!
//! A specification is the immutable input of a task: what to build, the
//! constraints, and how success is judged. Specifications live as YAML
//! documents in a catalogue and are read-only once a task starts.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
