//! Application configuration document.

use super::ConfigError;
use crate::routing::{
    domain::ModelTier,
    services::{DEFAULT_MAX_RETRIES, RoutingPolicy},
};
use crate::workspace::domain::{BranchName, DEFAULT_BASE_BRANCH};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Provider written by `multiagent init` unless overridden.
pub const DEFAULT_PROVIDER: &str = "cliproxy";
/// Completion endpoint written by `multiagent init` unless overridden.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8317/v1";
/// API key written by `multiagent init` unless overridden.
pub const DEFAULT_API_KEY: &str = "test-key-123";
/// QA loop iteration cap unless configured otherwise.
pub const DEFAULT_MAX_ITERATIONS: u32 = 50;

const DEFAULT_WORKTREE_BASE: &str = ".multiagent/worktrees";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 300;

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_owned()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_owned()
}

const fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

fn default_worktree_base() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_WORKTREE_BASE)
}

const fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_command_timeout_secs() -> u64 {
    DEFAULT_COMMAND_TIMEOUT_SECS
}

fn default_base_branch() -> String {
    DEFAULT_BASE_BRANCH.to_owned()
}

/// Startup configuration shared by the router, the workspace manager, and
/// the orchestrator.
///
/// Every field has a default, so a partial document decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion provider label.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Root URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent to the provider.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Preferred model per role.
    #[serde(default)]
    pub models: BTreeMap<String, String>,
    /// Ordered fallback models per role.
    #[serde(default)]
    pub fallback_chains: BTreeMap<String, Vec<String>>,
    /// QA loop iteration cap.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Worktree directory, relative to the project root unless absolute.
    #[serde(default = "default_worktree_base")]
    pub worktree_base: Utf8PathBuf,
    /// Tier overrides per role.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub role_tiers: BTreeMap<String, ModelTier>,
    /// Attempts allowed per completion call.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Time budget per completion request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Time budget per external command, in seconds.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    /// Branch tasks start from and merge back into.
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_base_url(),
            api_key: default_api_key(),
            models: BTreeMap::new(),
            fallback_chains: BTreeMap::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            worktree_base: default_worktree_base(),
            role_tiers: BTreeMap::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            base_branch: default_base_branch(),
        }
    }
}

fn owned(models: &[&str]) -> Vec<String> {
    models.iter().map(|model| (*model).to_owned()).collect()
}

impl AppConfig {
    /// Returns the configuration `multiagent init` writes.
    #[must_use]
    pub fn initial(
        provider: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let premium = ["gpt-5.2-codex", "gpt-5.1-codex-max", "gemini-2.5-pro"];
        let standard = ["gemini-2.5-pro", "gpt-5.1", "gpt-5.2"];
        let fast = ["gemini-2.5-flash", "gpt-5-codex-mini", "gemini-3-flash-preview"];
        let roles = [
            ("architect", &premium),
            ("reviewer", &premium),
            ("manager", &standard),
            ("coder", &fast),
            ("tester", &standard),
        ];
        Self {
            provider: provider.into(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            models: roles
                .iter()
                .filter_map(|(role, chain)| {
                    chain
                        .first()
                        .map(|model| ((*role).to_owned(), (*model).to_owned()))
                })
                .collect(),
            fallback_chains: roles
                .iter()
                .map(|(role, chain)| ((*role).to_owned(), owned(chain.as_slice())))
                .collect(),
            ..Self::default()
        }
    }

    /// Builds the routing policy these settings describe.
    ///
    /// A role's fallback chain is used as configured. A role with only a
    /// preferred model gets that model followed by its tier's chain.
    #[must_use]
    pub fn routing_policy(&self) -> RoutingPolicy {
        let mut policy = RoutingPolicy::default().with_max_retries(self.max_retries);
        for (role, tier) in &self.role_tiers {
            policy = policy.with_role_tier(role, *tier);
        }
        for (role, preferred) in &self.models {
            if self.fallback_chains.contains_key(role) {
                continue;
            }
            let mut chain = vec![preferred.clone()];
            for model in policy.tier_chain(policy.tier_for(role)) {
                if !chain.contains(&model) {
                    chain.push(model);
                }
            }
            policy = policy.with_role_chain(role, chain);
        }
        for (role, chain) in &self.fallback_chains {
            policy = policy.with_role_chain(role, chain.clone());
        }
        policy
    }

    /// Returns the time budget per completion request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the time budget per external command.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Returns the validated base branch.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBranch`] when the configured name is
    /// not a valid branch.
    pub fn base_branch(&self) -> Result<BranchName, ConfigError> {
        Ok(BranchName::new(self.base_branch.clone())?)
    }
}
