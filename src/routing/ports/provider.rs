//! Completion provider port.

use crate::routing::domain::{Completion, CompletionRequest, ProviderError};
use async_trait::async_trait;

/// Chat-completion backend reachable by model identifier.
///
/// Implementations own the transport and only report whether a call
/// succeeded or which class of failure occurred.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Issues `request` against `model`.
    ///
    /// # Errors
    ///
    /// Returns a classified [`ProviderError`] when the call fails.
    async fn complete(
        &self,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<Completion, ProviderError>;
}
