//! Routing errors and provider failure classification.

use std::fmt;
use thiserror::Error;

/// Validation failures for routing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingDomainError {
    /// A fallback chain has no usable model.
    #[error("fallback chain '{0}' has no models")]
    EmptyChain(String),

    /// The tier name is not recognised.
    #[error("unknown model tier: {0}")]
    UnknownTier(String),

    /// The role name is not recognised.
    #[error("unknown agent role: {0}")]
    UnknownRole(String),
}

/// Outcome class of a failed completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// Credentials were rejected.
    Auth,
    /// The provider throttled the request.
    RateLimit,
    /// The upstream server failed.
    Server,
    /// Any other failure, including timeouts and malformed responses.
    Other,
}

impl ProviderErrorKind {
    /// Returns whether this failure moves routing to the next model.
    #[must_use]
    pub const fn advances_chain(self) -> bool {
        matches!(self, Self::Auth | Self::RateLimit | Self::Server)
    }

    /// Classifies an HTTP status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            429 => Self::RateLimit,
            500..=599 => Self::Server,
            _ => Self::Other,
        }
    }

    /// Returns a stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::RateLimit => "rate_limit",
            Self::Server => "server",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure of a single completion call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct ProviderError {
    kind: ProviderErrorKind,
    message: String,
}

impl ProviderError {
    /// Creates a classified provider error.
    #[must_use]
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates an error classified from an HTTP status.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        Self::new(
            ProviderErrorKind::from_status(status),
            format!("HTTP {status}: {}", body.trim()),
        )
    }

    /// Returns the failure class.
    #[must_use]
    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    /// Returns the failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Why routing gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustionReason {
    /// Every model in the chain failed with a chain-advancing error.
    ChainExhausted,
    /// The attempt budget ran out before the chain did.
    RetryBudgetSpent,
}

impl fmt::Display for ExhaustionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ChainExhausted => "every model in the chain failed",
            Self::RetryBudgetSpent => "retry budget spent",
        })
    }
}

/// Every attempt allowed for a completion failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model routing for '{chain}' gave up after {attempts} attempt(s), {reason}: {last}")]
pub struct ModelExhaustionError {
    /// Name of the chain that was exhausted.
    pub chain: String,
    /// Why routing stopped.
    pub reason: ExhaustionReason,
    /// Number of attempts made.
    pub attempts: u32,
    /// Error from the final attempt.
    #[source]
    pub last: ProviderError,
}
