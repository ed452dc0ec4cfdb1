//! Hook invoked after each review round.

use crate::review::domain::IterationRecord;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure raised by an [`IterationObserver`].
#[derive(Debug, Clone, Error)]
#[error("iteration observer failed: {0}")]
pub struct ObserverError(pub Arc<dyn std::error::Error + Send + Sync>);

impl ObserverError {
    /// Wraps the observer's underlying failure.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}

/// Receives every iteration record before the loop branches on it.
///
/// The orchestrator uses this hook to persist the audit trail so that a
/// crash mid-loop never loses a completed review round.
#[async_trait]
pub trait IterationObserver: Send {
    /// Called once per review round with the freshly appended record.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError`] to abort the loop.
    async fn on_iteration(&mut self, record: &IterationRecord) -> Result<(), ObserverError>;
}

/// Observer that ignores every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

#[async_trait]
impl IterationObserver for NoopObserver {
    async fn on_iteration(&mut self, _record: &IterationRecord) -> Result<(), ObserverError> {
        Ok(())
    }
}
