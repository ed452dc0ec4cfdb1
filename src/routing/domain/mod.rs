//! Domain types for model routing.

mod chain;
mod error;
mod request;
mod role;
mod tier;

pub use chain::FallbackChain;
pub use error::{
    ExhaustionReason, ModelExhaustionError, ProviderError, ProviderErrorKind, RoutingDomainError,
};
pub use request::{ChatMessage, Completion, CompletionRequest, MessageRole};
pub use role::{AgentRole, tier_for_role};
pub use tier::ModelTier;
