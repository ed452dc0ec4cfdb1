//! Command policy for agent-issued shell actions.
//!
//! Every shell command an agent asks for is validated before it runs: a
//! blacklist of dangerous patterns, a whitelist of permitted programs, and
//! an optional directory the command must stay inside. A breach is a
//! [`domain::PolicyViolation`] and the command never executes.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
