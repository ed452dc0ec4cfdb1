//! QA review loop.
//!
//! Drives an artifact through repeated review and fix rounds until the
//! reviewer approves it, the same issues keep recurring, or an iteration cap
//! is reached. Reviewer output is treated as untrusted text: the loop tries a
//! strict structured decode first and falls back to a heuristic classifier,
//! tagging every verdict with the path that produced it.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
