//! Adapter implementations of the specification catalogue port.
//!
//! - [`fs::FileSpecificationCatalogue`]: one YAML document per name
//! - [`memory::InMemorySpecificationCatalogue`]: preloaded documents for
//!   tests

pub mod fs;
pub mod memory;
