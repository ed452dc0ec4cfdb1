//! Logical agent roles and their default tiers.

use super::{ModelTier, RoutingDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical role issuing model calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Produces implementation plans.
    Architect,
    /// Reviews artifacts and issues verdicts.
    Reviewer,
    /// Coordinates the other roles.
    Manager,
    /// Writes and fixes code.
    Coder,
    /// Writes and fixes frontend code.
    CoderFrontend,
    /// Writes and fixes backend code.
    CoderBackend,
    /// Writes tests.
    Tester,
}

impl AgentRole {
    /// Every role.
    pub const ALL: [Self; 7] = [
        Self::Architect,
        Self::Reviewer,
        Self::Manager,
        Self::Coder,
        Self::CoderFrontend,
        Self::CoderBackend,
        Self::Tester,
    ];

    /// Returns the canonical configuration key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Architect => "architect",
            Self::Reviewer => "reviewer",
            Self::Manager => "manager",
            Self::Coder => "coder",
            Self::CoderFrontend => "coder_frontend",
            Self::CoderBackend => "coder_backend",
            Self::Tester => "tester",
        }
    }

    /// Returns the tier this role uses unless configuration overrides it.
    #[must_use]
    pub const fn default_tier(self) -> ModelTier {
        match self {
            Self::Architect | Self::Reviewer => ModelTier::Premium,
            Self::Manager | Self::Tester => ModelTier::Standard,
            Self::Coder | Self::CoderFrontend | Self::CoderBackend => ModelTier::Fast,
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentRole {
    type Error = RoutingDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| RoutingDomainError::UnknownRole(value.to_owned()))
    }
}

/// Returns the default tier for a role name; unknown roles use
/// [`ModelTier::Standard`].
///
/// # Examples
///
///     use multiagent::routing::domain::{ModelTier, tier_for_role};
///
///     assert_eq!(tier_for_role("architect"), ModelTier::Premium);
///     assert_eq!(tier_for_role("coder_backend"), ModelTier::Fast);
///     assert_eq!(tier_for_role("poet"), ModelTier::Standard);
#[must_use]
pub fn tier_for_role(role: &str) -> ModelTier {
    AgentRole::try_from(role).map_or(ModelTier::Standard, AgentRole::default_tier)
}
