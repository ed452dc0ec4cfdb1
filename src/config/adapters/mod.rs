//! Configuration storage adapters.

pub mod fs;
