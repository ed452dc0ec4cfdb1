//! Reviewer and fixer collaborator contracts.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent calls.
pub type AgentResult<T> = Result<T, AgentError>;

/// Failure reported by an agent collaborator.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    /// The agent's backing call failed.
    #[error("agent call failed: {0}")]
    Call(Arc<dyn std::error::Error + Send + Sync>),

    /// The agent returned no usable output.
    #[error("agent returned empty output")]
    EmptyOutput,
}

impl AgentError {
    /// Wraps the error raised by an agent's backing call.
    pub fn call(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Call(Arc::new(err))
    }
}

/// Produces raw review text for an artifact.
///
/// Implementations should be pure functions of the artifact so that
/// recurring-issue detection is meaningful.
#[async_trait]
pub trait Reviewer: Send + Sync {
    /// Reviews `artifact` and returns the reviewer's raw output.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] when the review cannot be obtained.
    async fn review(&self, artifact: &str) -> AgentResult<String>;
}

/// Produces a revised artifact addressing reported issues.
#[async_trait]
pub trait Fixer: Send + Sync {
    /// Returns a new revision of `artifact` addressing `issues`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] when the fix cannot be obtained.
    async fn fix(&self, artifact: &str, issues: &[String]) -> AgentResult<String>;
}

#[async_trait]
impl<F> Reviewer for F
where
    F: Fn(&str) -> AgentResult<String> + Send + Sync,
{
    async fn review(&self, artifact: &str) -> AgentResult<String> {
        (self)(artifact)
    }
}

#[async_trait]
impl<F> Fixer for F
where
    F: Fn(&str, &[String]) -> AgentResult<String> + Send + Sync,
{
    async fn fix(&self, artifact: &str, issues: &[String]) -> AgentResult<String> {
        (self)(artifact, issues)
    }
}
