//! Specification catalogue port.

use crate::specification::domain::{SpecName, SpecificationDomainError, TaskSpecification};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type for specification catalogue operations.
pub type SpecificationResult<T> = Result<T, SpecificationError>;

/// Named collection of task specifications.
#[async_trait]
pub trait SpecificationCatalogue: Send + Sync {
    /// Writes an editable template for `name` and returns its location.
    ///
    /// # Errors
    ///
    /// Returns [`SpecificationError::AlreadyExists`] rather than
    /// overwriting an existing specification.
    async fn create_template(&self, name: &SpecName) -> SpecificationResult<Utf8PathBuf>;

    /// Lists every specification name in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`SpecificationError::Persistence`] when enumeration fails.
    async fn list(&self) -> SpecificationResult<Vec<SpecName>>;

    /// Loads and decodes the specification called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecificationError::NotFound`] when it does not exist and
    /// [`SpecificationError::Malformed`] when it cannot be decoded.
    async fn load(&self, name: &SpecName) -> SpecificationResult<TaskSpecification>;
}

/// Errors returned by specification catalogues.
#[derive(Debug, Clone, Error)]
pub enum SpecificationError {
    /// No specification has this name.
    #[error("specification not found: {0}")]
    NotFound(SpecName),

    /// A specification with this name already exists.
    #[error("specification already exists: {0}")]
    AlreadyExists(SpecName),

    /// The stored document is not a valid specification.
    #[error("malformed specification {name}: {source}")]
    Malformed {
        /// Name of the unreadable specification.
        name: SpecName,
        /// Decoding failure.
        source: Arc<serde_yaml::Error>,
    },

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] SpecificationDomainError),

    /// Storage-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SpecificationError {
    /// Wraps a storage error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
