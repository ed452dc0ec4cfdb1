//! Specification domain types.

mod error;
mod name;
mod spec;

pub use error::SpecificationDomainError;
pub use name::SpecName;
pub use spec::TaskSpecification;
