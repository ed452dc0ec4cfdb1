//! Port contracts for specification storage.

mod catalogue;

pub use catalogue::{SpecificationCatalogue, SpecificationError, SpecificationResult};
