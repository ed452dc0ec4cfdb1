//! Routing configuration consumed by [`super::ModelRouter`].

use crate::routing::domain::{ModelTier, tier_for_role};
use std::collections::BTreeMap;

/// Attempts allowed per completion call unless configured otherwise.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Chains, role overrides, and retry budget for a router.
///
/// Tiers without an explicit chain use [`ModelTier::default_chain`]. A role
/// with its own chain bypasses tier routing entirely; otherwise the role's
/// tier comes from the override table or [`tier_for_role`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingPolicy {
    tier_chains: BTreeMap<ModelTier, Vec<String>>,
    role_chains: BTreeMap<String, Vec<String>>,
    role_tiers: BTreeMap<String, ModelTier>,
    max_retries: u32,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self {
            tier_chains: ModelTier::ALL
                .into_iter()
                .map(|tier| (tier, tier.default_chain()))
                .collect(),
            role_chains: BTreeMap::new(),
            role_tiers: BTreeMap::new(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

fn role_key(role: &str) -> String {
    role.trim().to_ascii_lowercase()
}

impl RoutingPolicy {
    /// Replaces the chain used for `tier`.
    #[must_use]
    pub fn with_tier_chain(mut self, tier: ModelTier, models: Vec<String>) -> Self {
        self.tier_chains.insert(tier, models);
        self
    }

    /// Gives `role` a dedicated chain.
    #[must_use]
    pub fn with_role_chain(mut self, role: &str, models: Vec<String>) -> Self {
        self.role_chains.insert(role_key(role), models);
        self
    }

    /// Routes `role` through `tier` instead of its default tier.
    #[must_use]
    pub fn with_role_tier(mut self, role: &str, tier: ModelTier) -> Self {
        self.role_tiers.insert(role_key(role), tier);
        self
    }

    /// Sets the attempt budget per call; zero is raised to one.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Returns the attempt budget per call.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the chain configured for `tier`.
    #[must_use]
    pub fn tier_chain(&self, tier: ModelTier) -> Vec<String> {
        self.tier_chains
            .get(&tier)
            .cloned()
            .unwrap_or_else(|| tier.default_chain())
    }

    /// Returns every role with a dedicated chain.
    pub fn role_chains(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.role_chains
            .iter()
            .map(|(role, models)| (role.as_str(), models.as_slice()))
    }

    /// Returns whether `role` has a dedicated chain.
    #[must_use]
    pub fn has_role_chain(&self, role: &str) -> bool {
        self.role_chains.contains_key(&role_key(role))
    }

    /// Returns the tier `role` routes through when it has no chain of its
    /// own.
    #[must_use]
    pub fn tier_for(&self, role: &str) -> ModelTier {
        let key = role_key(role);
        self.role_tiers
            .get(&key)
            .copied()
            .unwrap_or_else(|| tier_for_role(&key))
    }
}
