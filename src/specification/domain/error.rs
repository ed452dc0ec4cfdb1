//! Specification validation errors.

use thiserror::Error;

/// Validation failures for specification values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecificationDomainError {
    /// The specification name cannot be used as a file stem.
    #[error("invalid specification name: {0}")]
    InvalidName(String),
}
