//! Resilient completion client routing calls through fallback chains.

use super::RoutingPolicy;
use crate::routing::{
    domain::{
        Completion, CompletionRequest, ExhaustionReason, FallbackChain, ModelExhaustionError,
        ModelTier, ProviderError, RoutingDomainError,
    },
    ports::CompletionProvider,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ChainKey {
    Tier(ModelTier),
    Role(String),
}

impl fmt::Display for ChainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tier(tier) => write!(f, "{tier}"),
            Self::Role(role) => write!(f, "role:{role}"),
        }
    }
}

/// Routes completion requests through tiered fallback chains.
///
/// Chain positions live only as long as the router: a degraded tier keeps
/// using its last working model for later calls, while a fresh router
/// starts every chain at its head. Exhausting a chain fails the call and
/// rewinds that chain.
///
/// # Examples
///
///     use std::sync::Arc;
///     use multiagent::routing::{
///         adapters::memory::{ScriptedCompletionProvider, ScriptedReply},
///         domain::ModelTier,
///         services::{ModelRouter, RoutingPolicy},
///     };
///
///     let provider = ScriptedCompletionProvider::new()
///         .with_default(ScriptedReply::text("done"));
///     let router = ModelRouter::new(Arc::new(provider), RoutingPolicy::default())
///         .expect("default chains are valid");
///     assert_eq!(router.current_model(ModelTier::Fast), Some("gemini-2.5-flash".to_owned()));
pub struct ModelRouter<P>
where
    P: CompletionProvider,
{
    provider: Arc<P>,
    policy: RoutingPolicy,
    chains: Mutex<BTreeMap<ChainKey, FallbackChain>>,
}

impl<P> ModelRouter<P>
where
    P: CompletionProvider,
{
    /// Creates a router with every chain at its head model.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingDomainError::EmptyChain`] when a configured chain
    /// has no usable model.
    pub fn new(provider: Arc<P>, policy: RoutingPolicy) -> Result<Self, RoutingDomainError> {
        let mut chains = BTreeMap::new();
        for tier in ModelTier::ALL {
            let chain = FallbackChain::new(tier.as_str(), policy.tier_chain(tier))?;
            chains.insert(ChainKey::Tier(tier), chain);
        }
        for (role, models) in policy.role_chains() {
            let chain = FallbackChain::new(role, models.to_vec())?;
            chains.insert(ChainKey::Role(role.to_owned()), chain);
        }
        Ok(Self {
            provider,
            policy,
            chains: Mutex::new(chains),
        })
    }

    /// Returns the routing policy.
    #[must_use]
    pub const fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    /// Returns the model the next call for `tier` goes to.
    #[must_use]
    pub fn current_model(&self, tier: ModelTier) -> Option<String> {
        self.lock()
            .get(&ChainKey::Tier(tier))
            .map(|chain| chain.current().to_owned())
    }

    /// Issues `request` against the current model of `tier`'s chain.
    ///
    /// # Errors
    ///
    /// Returns [`ModelExhaustionError`] when the chain runs out or the
    /// attempt budget is spent.
    pub async fn complete(
        &self,
        tier: ModelTier,
        request: &CompletionRequest,
    ) -> Result<Completion, ModelExhaustionError> {
        self.complete_on(&ChainKey::Tier(tier), request).await
    }

    /// Issues `request` on behalf of `role`.
    ///
    /// A role with a dedicated chain uses it; any other role routes through
    /// its configured or default tier.
    ///
    /// # Errors
    ///
    /// Returns [`ModelExhaustionError`] when the chain runs out or the
    /// attempt budget is spent.
    pub async fn complete_for_role(
        &self,
        role: &str,
        request: &CompletionRequest,
    ) -> Result<Completion, ModelExhaustionError> {
        let key = if self.policy.has_role_chain(role) {
            ChainKey::Role(role.trim().to_ascii_lowercase())
        } else {
            ChainKey::Tier(self.policy.tier_for(role))
        };
        self.complete_on(&key, request).await
    }

    async fn complete_on(
        &self,
        key: &ChainKey,
        request: &CompletionRequest,
    ) -> Result<Completion, ModelExhaustionError> {
        let max_retries = self.policy.max_retries();
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            let model = self.model_for(key);
            debug!(chain = %key, model = %model, attempt, "issuing completion");
            let failure = match self.provider.complete(&model, request).await {
                Ok(completion) => return Ok(completion),
                Err(err) => err,
            };
            warn!(
                chain = %key,
                model = %model,
                attempt,
                kind = %failure.kind(),
                error = %failure.message(),
                "completion attempt failed"
            );

            if failure.kind().advances_chain() && !self.switch_model(key, &model) {
                error!(chain = %key, attempts = attempt, "fallback chain exhausted");
                self.rewind(key);
                return Err(exhausted(key, ExhaustionReason::ChainExhausted, attempt, failure));
            }
            if attempt >= max_retries {
                error!(chain = %key, attempts = attempt, "retry budget spent");
                return Err(exhausted(key, ExhaustionReason::RetryBudgetSpent, attempt, failure));
            }
        }
    }

    fn model_for(&self, key: &ChainKey) -> String {
        self.lock()
            .get(key)
            .map(|chain| chain.current().to_owned())
            .unwrap_or_default()
    }

    fn switch_model(&self, key: &ChainKey, from: &str) -> bool {
        let mut chains = self.lock();
        let Some(chain) = chains.get_mut(key) else {
            return false;
        };
        if !chain.advance() {
            return false;
        }
        info!(chain = %key, from, to = chain.current(), "switching to fallback model");
        true
    }

    fn rewind(&self, key: &ChainKey) {
        if let Some(chain) = self.lock().get_mut(key) {
            chain.reset();
            info!(chain = %key, model = chain.current(), "fallback chain rewound to head");
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ChainKey, FallbackChain>> {
        self.chains.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn exhausted(
    key: &ChainKey,
    reason: ExhaustionReason,
    attempts: u32,
    last: ProviderError,
) -> ModelExhaustionError {
    ModelExhaustionError {
        chain: key.to_string(),
        reason,
        attempts,
        last,
    }
}
