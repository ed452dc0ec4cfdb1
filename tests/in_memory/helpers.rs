//! Shared fixtures for the end-to-end pipeline tests.

use camino::Utf8PathBuf;
use mockable::DefaultClock;
use multiagent::orchestration::{
    adapters::router::RouterTaskAgents,
    services::{OrchestratorSettings, TaskOrchestrator},
};
use multiagent::routing::{
    adapters::memory::{ScriptedCompletionProvider, ScriptedReply},
    services::{ModelRouter, RoutingPolicy},
};
use multiagent::specification::adapters::fs::FileSpecificationCatalogue;
use multiagent::task::{adapters::fs::FileTaskStateStore, domain::TaskId};
use multiagent::workspace::{
    adapters::memory::InMemoryWorkspaceManager,
    domain::{ArtifactPath, Workspace},
    ports::WorkspaceManager,
};
use rstest::fixture;
use std::sync::Arc;
use tempfile::TempDir;

/// Model the default policy routes planning and review to.
pub const ARCHITECT_MODEL: &str = "gpt-5.2-codex";
/// Model the default policy routes implementation to.
pub const CODER_MODEL: &str = "gemini-2.5-flash";
/// Model the default policy routes test writing to.
pub const TESTER_MODEL: &str = "gemini-2.5-pro";

/// Orchestrator wired the way the binary wires it, minus git and HTTP.
pub type Pipeline = TaskOrchestrator<
    FileTaskStateStore<DefaultClock>,
    InMemoryWorkspaceManager,
    RouterTaskAgents<ScriptedCompletionProvider>,
    FileSpecificationCatalogue<DefaultClock>,
>;

const LOGIN_SPEC: &str = "\
name: login
description: Add a login form
requirements:
  - Validate credentials
acceptance_criteria:
  - Wrong passwords are refused
";

/// A project directory holding task state and one `login` specification.
pub struct Project {
    _dir: TempDir,
    /// Project directory.
    pub root: Utf8PathBuf,
    /// Workspaces shared by every orchestrator built for this project.
    pub workspaces: Arc<InMemoryWorkspaceManager>,
}

/// Provides a fresh project for each test.
#[fixture]
pub fn project() -> Project {
    let dir = TempDir::new().expect("temporary directory");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path");
    std::fs::create_dir_all(root.join("specs")).expect("create specs directory");
    std::fs::write(root.join("specs/login.yaml"), LOGIN_SPEC).expect("write spec");
    Project {
        _dir: dir,
        root,
        workspaces: Arc::new(InMemoryWorkspaceManager::new("/wt")),
    }
}

impl Project {
    /// Builds an orchestrator over this project's state.
    pub fn pipeline(&self, provider: &ScriptedCompletionProvider) -> Pipeline {
        let clock = Arc::new(DefaultClock);
        let router = ModelRouter::new(Arc::new(provider.clone()), RoutingPolicy::default())
            .expect("default chains are valid");
        TaskOrchestrator::new(
            Arc::new(FileTaskStateStore::new(self.root.join("tasks"), Arc::clone(&clock))),
            Arc::clone(&self.workspaces),
            Arc::new(RouterTaskAgents::new(Arc::new(router))),
            Arc::new(FileSpecificationCatalogue::new(self.root.join("specs"), clock)),
            OrchestratorSettings::default(),
        )
    }

    /// Returns the task state store of this project.
    pub fn store(&self) -> FileTaskStateStore<DefaultClock> {
        FileTaskStateStore::new(self.root.join("tasks"), Arc::new(DefaultClock))
    }

    /// Reads a phase artifact from the task's workspace.
    pub async fn artifact(&self, task_id: &TaskId, stem: &str) -> Option<String> {
        let workspace = Workspace::new(task_id.clone(), format!("/wt/{task_id}"));
        let path = ArtifactPath::phase_output(stem).expect("valid artifact path");
        self.workspaces
            .read_artifact(&workspace, &path)
            .await
            .expect("artifact readable")
    }
}

/// Parses a task identifier known to be valid.
pub fn task_id(value: &str) -> TaskId {
    TaskId::new(value).expect("valid task id")
}

/// A successful reply carrying `content`.
pub fn text(content: &str) -> ScriptedReply {
    ScriptedReply::text(content)
}

/// A structured approval verdict.
pub fn approve() -> ScriptedReply {
    text(r#"{"approved": true, "issues": []}"#)
}

/// A structured rejection raising `issue`.
pub fn reject(issue: &str) -> ScriptedReply {
    ScriptedReply::text(format!(r#"{{"approved": false, "issues": ["{issue}"]}}"#))
}
