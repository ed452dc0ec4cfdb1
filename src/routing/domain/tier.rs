//! Capability tiers.

use super::RoutingDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse capability and cost class of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    /// Strongest reasoning models.
    Premium,
    /// Balanced models.
    Standard,
    /// Fast, inexpensive models.
    Fast,
}

impl ModelTier {
    /// Every tier from strongest to cheapest.
    pub const ALL: [Self; 3] = [Self::Premium, Self::Standard, Self::Fast];

    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Premium => "premium",
            Self::Standard => "standard",
            Self::Fast => "fast",
        }
    }

    /// Returns the built-in fallback chain for this tier.
    #[must_use]
    pub fn default_chain(self) -> Vec<String> {
        let models: &[&str] = match self {
            Self::Premium => &[
                "gpt-5.2-codex",
                "gpt-5.1-codex",
                "gpt-5.2",
                "gpt-5.1",
                "kiro-claude-opus-4-5-agentic",
                "kiro-claude-sonnet-4-5-agentic",
                "kiro-claude-opus-4-5",
                "gemini-claude-opus-4-5-thinking",
                "gemini-claude-sonnet-4-5-thinking",
                "gemini-claude-sonnet-4-5",
                "gemini-3-pro-preview",
                "gemini-2.5-pro",
            ],
            Self::Standard => &[
                "gemini-2.5-pro",
                "kiro-claude-sonnet-4-5",
                "kiro-claude-sonnet-4",
                "gpt-5.1-codex-mini",
                "gemini-3-flash-preview",
                "gemini-2.5-flash",
                "gpt-5-codex-mini",
            ],
            Self::Fast => &[
                "gemini-2.5-flash",
                "gemini-2.5-flash-lite",
                "gemini-3-flash-preview",
                "tab_flash_lite_preview",
                "gpt-5-codex-mini",
                "gpt-5.1-codex-mini",
                "kiro-claude-haiku-4-5",
            ],
        };
        models.iter().map(|model| (*model).to_owned()).collect()
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ModelTier {
    type Error = RoutingDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == normalized)
            .ok_or_else(|| RoutingDomainError::UnknownTier(value.to_owned()))
    }
}
