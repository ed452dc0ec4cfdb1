//! In-memory specification catalogue.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::specification::{
    domain::{SpecName, TaskSpecification},
    ports::{SpecificationCatalogue, SpecificationError, SpecificationResult},
};

/// Thread-safe catalogue holding decoded specifications.
///
/// Templates are stored as specifications carrying only their name.
#[derive(Debug, Clone, Default)]
pub struct InMemorySpecificationCatalogue {
    specs: Arc<RwLock<BTreeMap<SpecName, TaskSpecification>>>,
}

impl InMemorySpecificationCatalogue {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `spec` under `name`, replacing any previous entry.
    #[must_use]
    pub fn with_spec(self, name: SpecName, spec: TaskSpecification) -> Self {
        if let Ok(mut specs) = self.specs.write() {
            specs.insert(name, spec);
        }
        self
    }
}

fn lock_error(err: impl std::fmt::Display) -> SpecificationError {
    SpecificationError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SpecificationCatalogue for InMemorySpecificationCatalogue {
    async fn create_template(&self, name: &SpecName) -> SpecificationResult<Utf8PathBuf> {
        let mut specs = self.specs.write().map_err(lock_error)?;
        if specs.contains_key(name) {
            return Err(SpecificationError::AlreadyExists(name.clone()));
        }
        specs.insert(name.clone(), TaskSpecification::new(name.as_str(), ""));
        Ok(Utf8Path::new("memory").join(format!("{name}.yaml")))
    }

    async fn list(&self) -> SpecificationResult<Vec<SpecName>> {
        let specs = self.specs.read().map_err(lock_error)?;
        Ok(specs.keys().cloned().collect())
    }

    async fn load(&self, name: &SpecName) -> SpecificationResult<TaskSpecification> {
        let specs = self.specs.read().map_err(lock_error)?;
        specs
            .get(name)
            .cloned()
            .ok_or_else(|| SpecificationError::NotFound(name.clone()))
    }
}
