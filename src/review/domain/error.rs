//! Domain errors for the review context.

use thiserror::Error;

/// Failure to render a prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to render {template} prompt: {reason}")]
pub struct PromptRenderError {
    /// Name of the template that failed.
    pub template: &'static str,
    /// Renderer diagnostic.
    pub reason: String,
}
