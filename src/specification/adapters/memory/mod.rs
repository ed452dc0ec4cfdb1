//! In-memory adapter implementations for testing.

mod catalogue;

pub use catalogue::InMemorySpecificationCatalogue;
