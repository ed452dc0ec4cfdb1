//! Tests for defaults, routing derivation, and the JSON store.

use crate::config::{
    adapters::fs::ConfigStore,
    domain::{AppConfig, ConfigError, DEFAULT_BASE_URL, ProjectLayout},
};
use crate::routing::domain::ModelTier;
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use std::time::Duration;
use tempfile::TempDir;

struct LayoutFixture {
    _dir: TempDir,
    layout: ProjectLayout,
}

#[fixture]
fn project() -> LayoutFixture {
    let dir = TempDir::new().expect("temporary directory");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
    LayoutFixture {
        _dir: dir,
        layout: ProjectLayout::new(root),
    }
}

#[rstest]
fn initial_configuration_matches_init_defaults() {
    let config = AppConfig::initial("cliproxy", DEFAULT_BASE_URL, "key");

    assert_eq!(config.models.get("coder").map(String::as_str), Some("gemini-2.5-flash"));
    assert_eq!(config.models.get("manager").map(String::as_str), Some("gemini-2.5-pro"));
    assert_eq!(
        config.fallback_chains.get("architect"),
        Some(&vec![
            "gpt-5.2-codex".to_owned(),
            "gpt-5.1-codex-max".to_owned(),
            "gemini-2.5-pro".to_owned(),
        ])
    );
    assert_eq!(config.max_iterations, 50);
    assert_eq!(config.worktree_base, ".multiagent/worktrees");
    assert_eq!(config.base_branch, "main");
}

#[rstest]
fn partial_document_takes_defaults() {
    let config: AppConfig =
        serde_json::from_str(r#"{"provider": "local", "max_iterations": 7}"#).expect("decodes");

    assert_eq!(config.provider, "local");
    assert_eq!(config.max_iterations, 7);
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.request_timeout(), Duration::from_secs(120));
    assert_eq!(config.command_timeout(), Duration::from_secs(300));
}

#[rstest]
fn fallback_chain_becomes_role_chain() {
    let policy = AppConfig::initial("cliproxy", DEFAULT_BASE_URL, "key").routing_policy();

    assert!(policy.has_role_chain("architect"));
    assert!(policy.has_role_chain("tester"));
    assert!(!policy.has_role_chain("coder_backend"));
}

#[rstest]
fn preferred_model_leads_its_tier_chain() {
    let mut config = AppConfig::default();
    config
        .models
        .insert("coder".to_owned(), "local-coder".to_owned());

    let policy = config.routing_policy();
    let chains: Vec<(&str, &[String])> = policy.role_chains().collect();

    let Some((_, chain)) = chains.iter().find(|(role, _)| *role == "coder") else {
        panic!("coder chain configured");
    };
    assert_eq!(chain.first().map(String::as_str), Some("local-coder"));
    assert_eq!(
        chain.get(1).map(String::as_str),
        ModelTier::Fast.default_chain().first().map(String::as_str)
    );
}

#[rstest]
fn role_tier_override_is_applied() {
    let mut config = AppConfig::default();
    config.role_tiers.insert("tester".to_owned(), ModelTier::Premium);

    assert_eq!(config.routing_policy().tier_for("tester"), ModelTier::Premium);
}

#[rstest]
fn invalid_base_branch_is_reported() {
    let config = AppConfig {
        base_branch: "bad..branch".to_owned(),
        ..AppConfig::default()
    };

    assert!(matches!(config.base_branch(), Err(ConfigError::InvalidBranch(_))));
}

#[rstest]
fn missing_configuration_instructs_initialisation(project: LayoutFixture) {
    let store = ConfigStore::new(project.layout.config_path());

    let err = store.load().expect_err("nothing saved yet");

    assert!(matches!(err, ConfigError::NotFound { .. }));
    assert!(err.to_string().contains("multiagent init"));
}

#[rstest]
fn saved_configuration_loads_back(project: LayoutFixture) {
    let store = ConfigStore::new(project.layout.config_path());
    let config = AppConfig::initial("cliproxy", "http://localhost:9/v1", "secret");

    store.save(&config).expect("save config");

    assert_eq!(store.load().expect("load config"), config);
}

#[rstest]
fn malformed_configuration_is_reported(project: LayoutFixture) {
    let path = project.layout.config_path();
    std::fs::create_dir_all(project.layout.state_dir()).expect("create state dir");
    std::fs::write(&path, "{ not json").expect("seed config");

    let err = ConfigStore::new(path).load().expect_err("malformed");

    assert!(matches!(err, ConfigError::Malformed { .. }));
}

#[rstest]
fn layout_creates_working_directories(project: LayoutFixture) {
    project.layout.ensure().expect("create layout");

    for dir in [
        project.layout.tasks_dir(),
        project.layout.worktrees_dir(),
        project.layout.logs_dir(),
    ] {
        assert!(dir.is_dir(), "{dir} should exist");
    }
    assert!(!project.layout.specs_dir().exists());
}
