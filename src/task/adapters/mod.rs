//! Persistence adapters for task records.
//!
//! # Available Adapters
//!
//! - [`fs::FileTaskStateStore`]: one JSON file per task, written atomically
//!   through a temporary file and a rename
//! - [`memory::InMemoryTaskStateStore`]: thread-safe in-memory storage for
//!   tests

pub mod fs;
pub mod memory;
