//! Behavioural tests for the task orchestrator over in-memory adapters.

use std::sync::{Arc, Mutex, PoisonError};

use crate::orchestration::{
    adapters::memory::ScriptedTaskAgents,
    domain::PhaseArtifact,
    ports::TaskAgents,
    services::{OrchestrationError, OrchestratorSettings, RunTaskRequest, TaskOrchestrator},
};
use crate::review::ports::{AgentError, AgentResult};
use crate::specification::{
    adapters::memory::InMemorySpecificationCatalogue,
    domain::{SpecName, TaskSpecification},
};
use crate::task::{
    adapters::memory::InMemoryTaskStateStore,
    domain::{Phase, TaskId, TaskRecord, TaskStatus},
    ports::TaskStateStore,
};
use crate::workspace::{
    adapters::memory::{InMemoryWorkspaceManager, MergeRecord},
    domain::BranchName,
    ports::{WorkspaceError, WorkspaceManager},
};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::rstest;

type Store = InMemoryTaskStateStore<DefaultClock>;

struct Harness<A: TaskAgents> {
    store: Arc<Store>,
    workspaces: Arc<InMemoryWorkspaceManager>,
    agents: Arc<A>,
    orchestrator: Orchestrator<A>,
}

type Orchestrator<A> =
    TaskOrchestrator<Store, InMemoryWorkspaceManager, A, InMemorySpecificationCatalogue>;

fn spec_name() -> SpecName {
    SpecName::new("login").expect("valid spec name")
}

fn task_id(value: &str) -> TaskId {
    TaskId::new(value).expect("valid task id")
}

fn harness_with<A: TaskAgents>(
    agents: A,
    store: Arc<Store>,
    settings: OrchestratorSettings,
) -> Harness<A> {
    let workspaces = Arc::new(InMemoryWorkspaceManager::new("/wt"));
    let agents = Arc::new(agents);
    let specs = InMemorySpecificationCatalogue::new().with_spec(
        spec_name(),
        TaskSpecification::new("login", "Add a login form")
            .with_requirements(["Validate credentials".to_owned()]),
    );
    let orchestrator = TaskOrchestrator::new(
        Arc::clone(&store),
        Arc::clone(&workspaces),
        Arc::clone(&agents),
        Arc::new(specs),
        settings,
    );
    Harness {
        store,
        workspaces,
        agents,
        orchestrator,
    }
}

fn harness(agents: ScriptedTaskAgents) -> Harness<ScriptedTaskAgents> {
    harness_with(
        agents,
        Arc::new(InMemoryTaskStateStore::new(Arc::new(DefaultClock))),
        OrchestratorSettings::default(),
    )
}

fn request(id: &str) -> RunTaskRequest {
    RunTaskRequest::new(spec_name()).with_task_id(task_id(id))
}

async fn stored<A: TaskAgents>(harness: &Harness<A>, id: &str) -> TaskRecord {
    harness
        .store
        .load(&task_id(id))
        .await
        .expect("store readable")
        .expect("record stored")
}

fn iterations_in(record: &TaskRecord, phase: Phase) -> usize {
    record
        .history()
        .iter()
        .filter(|iteration| iteration.phase == phase)
        .count()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approved_task_runs_through_every_phase() {
    let harness = harness(ScriptedTaskAgents::new());

    let report = harness
        .orchestrator
        .run(request("t-1"))
        .await
        .expect("task completes");

    assert_eq!(report.phase, Phase::Done);
    assert_eq!(report.status, TaskStatus::Done);
    assert!(report.is_done());
    assert_eq!(
        harness.agents.calls(),
        [
            "plan",
            "implementation",
            "review:implementation",
            "tests",
            "review:testing",
            "review:review",
        ]
    );
    assert_eq!(
        harness.workspaces.checkpoints(&task_id("t-1")),
        [
            "checkpoint: t-1 plan",
            "checkpoint: t-1 implementation",
            "checkpoint: t-1 tests",
            "checkpoint: t-1 review",
        ]
    );
    assert_eq!(
        harness.workspaces.merges(),
        [MergeRecord {
            task_id: task_id("t-1"),
            target: BranchName::main(),
            no_commit: true,
        }]
    );
    let record = stored(&harness, "t-1").await;
    assert_eq!(record.branch_name(), Some("task/t-1"));
    assert_eq!(record.worktree_path().map(|path| path.as_str()), Some("/wt/t-1"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_implementation_is_fixed_and_recorded() {
    let agents = ScriptedTaskAgents::new().with_verdicts(
        Phase::Implementation,
        [ScriptedTaskAgents::rejection(&["missing semicolon"])],
    );
    let harness = harness(agents);

    harness
        .orchestrator
        .run(request("t-1"))
        .await
        .expect("task completes");

    let record = stored(&harness, "t-1").await;
    assert_eq!(iterations_in(&record, Phase::Implementation), 2);
    assert_eq!(iterations_in(&record, Phase::Testing), 1);
    assert_eq!(iterations_in(&record, Phase::Review), 1);

    let workspace = harness
        .workspaces
        .find(&task_id("t-1"))
        .await
        .expect("workspace query")
        .expect("workspace exists");
    let implementation = harness
        .workspaces
        .read_artifact(
            &workspace,
            &PhaseArtifact::Implementation.path().expect("valid path"),
        )
        .await
        .expect("artifact readable")
        .expect("artifact written");
    assert_eq!(implementation, "implementation of login\nfixed: missing semicolon");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recurring_issues_block_the_task() {
    let agents = ScriptedTaskAgents::new().with_verdicts(
        Phase::Implementation,
        vec![ScriptedTaskAgents::rejection(&["same issue"]); 3],
    );
    let harness = harness(agents);

    let report = harness
        .orchestrator
        .run(request("t-1"))
        .await
        .expect("blocking is not an error");

    assert_eq!(report.phase, Phase::Implementation);
    assert_eq!(report.status, TaskStatus::Blocked);
    assert_eq!(report.last_issues, ["same issue"]);
    assert!(report.failure.is_none());
    assert!(harness.workspaces.merges().is_empty());

    let record = stored(&harness, "t-1").await;
    assert_eq!(record.status(), TaskStatus::Blocked);
    assert_eq!(iterations_in(&record, Phase::Implementation), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn iteration_cap_blocks_the_task() {
    let agents = ScriptedTaskAgents::new().with_verdicts(
        Phase::Testing,
        [
            ScriptedTaskAgents::rejection(&["flaky"]),
            ScriptedTaskAgents::rejection(&["slow"]),
        ],
    );
    let harness = harness(agents);

    let report = harness
        .orchestrator
        .run(request("t-1").with_max_iterations(2))
        .await
        .expect("blocking is not an error");

    assert_eq!(report.phase, Phase::Testing);
    assert_eq!(report.status, TaskStatus::Blocked);
    assert_eq!(report.last_issues, ["slow"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blocked_task_resumes_from_its_artifact() {
    let agents = ScriptedTaskAgents::new().with_verdicts(
        Phase::Implementation,
        vec![ScriptedTaskAgents::rejection(&["same issue"]); 3],
    );
    let harness = harness(agents);
    harness
        .orchestrator
        .run(request("t-1"))
        .await
        .expect("task blocks");

    let report = harness
        .orchestrator
        .resume(&task_id("t-1"))
        .await
        .expect("resumed task completes");

    assert_eq!(report.status, TaskStatus::Done);
    let authored = harness
        .agents
        .calls()
        .iter()
        .filter(|call| *call == "implementation")
        .count();
    assert_eq!(authored, 1, "the blocked artifact is reviewed again");
}

fn indices_in(record: &TaskRecord, phase: Phase) -> Vec<u32> {
    record
        .history()
        .iter()
        .filter(|iteration| iteration.phase == phase)
        .map(|iteration| iteration.record.iteration)
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resumed_task_keeps_its_iteration_cap_and_numbering() {
    let agents = ScriptedTaskAgents::new().with_verdicts(
        Phase::Implementation,
        ["a", "b", "c", "d", "e"].map(|issue| ScriptedTaskAgents::rejection(&[issue])),
    );
    let harness = harness(agents);
    harness
        .orchestrator
        .run(request("t-1").with_max_iterations(2))
        .await
        .expect("task blocks");
    let record = stored(&harness, "t-1").await;
    assert_eq!(record.max_iterations(), Some(2));

    let report = harness
        .orchestrator
        .resume(&task_id("t-1"))
        .await
        .expect("blocking is not an error");

    assert_eq!(report.status, TaskStatus::Blocked);
    assert_eq!(report.last_issues, ["d"]);
    let record = stored(&harness, "t-1").await;
    assert_eq!(record.iteration(), 4);
    assert_eq!(indices_in(&record, Phase::Implementation), [1, 2, 3, 4]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resume_without_pinned_cap_uses_the_configured_one() {
    let agents = ScriptedTaskAgents::new().with_verdicts(
        Phase::Testing,
        ["a", "b", "c"].map(|issue| ScriptedTaskAgents::rejection(&[issue])),
    );
    let harness = harness_with(
        agents,
        Arc::new(InMemoryTaskStateStore::new(Arc::new(DefaultClock))),
        OrchestratorSettings::new(1, BranchName::main()),
    );
    harness
        .orchestrator
        .run(request("t-1"))
        .await
        .expect("task blocks");
    assert_eq!(stored(&harness, "t-1").await.max_iterations(), None);

    let report = harness
        .orchestrator
        .resume(&task_id("t-1"))
        .await
        .expect("blocking is not an error");

    assert_eq!(report.status, TaskStatus::Blocked);
    assert_eq!(report.last_issues, ["b"]);
    assert_eq!(iterations_in(&stored(&harness, "t-1").await, Phase::Testing), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resuming_an_unknown_task_fails() {
    let harness = harness(ScriptedTaskAgents::new());

    let err = harness
        .orchestrator
        .resume(&task_id("ghost"))
        .await
        .expect_err("no record");

    assert!(matches!(err, OrchestrationError::TaskNotFound(id) if id.as_str() == "ghost"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lost_workspace_fails_the_task_on_resume() {
    let agents = ScriptedTaskAgents::new().with_verdicts(
        Phase::Implementation,
        vec![ScriptedTaskAgents::rejection(&["same issue"]); 3],
    );
    let harness = harness(agents);
    harness
        .orchestrator
        .run(request("t-1"))
        .await
        .expect("task blocks");
    harness.workspaces.lose_directory(&task_id("t-1"));

    let err = harness
        .orchestrator
        .resume(&task_id("t-1"))
        .await
        .expect_err("workspace is gone");

    assert!(matches!(err, OrchestrationError::WorkspaceMissing(_)));
    let record = stored(&harness, "t-1").await;
    assert_eq!(record.phase(), Phase::Failed);
    assert_eq!(record.status(), TaskStatus::Failed);
    assert_eq!(
        record.failure().map(|failure| failure.phase),
        Some(Phase::Implementation)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn agent_failure_fails_the_task() {
    let harness = harness(ScriptedTaskAgents::new().failing_at(Phase::Planning));

    let err = harness
        .orchestrator
        .run(request("t-1"))
        .await
        .expect_err("planning fails");

    assert!(matches!(err, OrchestrationError::Agent(AgentError::EmptyOutput)));
    let report = harness
        .orchestrator
        .status(&task_id("t-1"))
        .await
        .expect("record stored");
    assert_eq!(report.status, TaskStatus::Failed);
    assert!(matches!(
        report.failure,
        Some((Phase::Planning, ref message)) if message.contains("empty output")
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_base_branch_fails_the_task() {
    let develop = BranchName::new("develop").expect("valid branch");
    let harness = harness_with(
        ScriptedTaskAgents::new(),
        Arc::new(InMemoryTaskStateStore::new(Arc::new(DefaultClock))),
        OrchestratorSettings::new(5, develop),
    );

    let err = harness
        .orchestrator
        .run(request("t-1"))
        .await
        .expect_err("develop does not exist");

    assert!(matches!(
        err,
        OrchestrationError::Workspace(WorkspaceError::BaseBranchMissing(_))
    ));
    assert_eq!(stored(&harness, "t-1").await.status(), TaskStatus::Failed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_ids_are_not_reused() {
    let harness = harness(ScriptedTaskAgents::new());
    harness
        .orchestrator
        .run(request("t-1"))
        .await
        .expect("first run completes");

    let err = harness
        .orchestrator
        .run(request("t-1"))
        .await
        .expect_err("identifier taken");

    assert!(matches!(err, OrchestrationError::TaskExists(_)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finished_task_resumes_without_work() {
    let harness = harness(ScriptedTaskAgents::new());
    harness
        .orchestrator
        .run(request("t-1"))
        .await
        .expect("task completes");
    let calls = harness.agents.calls().len();

    let report = harness
        .orchestrator
        .resume(&task_id("t-1"))
        .await
        .expect("finished task is reported");

    assert_eq!(report.status, TaskStatus::Done);
    assert_eq!(harness.agents.calls().len(), calls);
    assert_eq!(harness.workspaces.merges().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn generated_ids_derive_from_the_spec_name() {
    let harness = harness(ScriptedTaskAgents::new());

    let report = harness
        .orchestrator
        .run(RunTaskRequest::new(spec_name()))
        .await
        .expect("task completes");

    assert!(report.task_id.as_str().starts_with("login-"));
    assert_eq!(report.spec_name, "login");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cleanup_can_forget_the_record() {
    let harness = harness(ScriptedTaskAgents::new());
    for id in ["t-1", "t-2"] {
        harness
            .orchestrator
            .run(request(id))
            .await
            .expect("task completes");
    }

    harness
        .orchestrator
        .cleanup(&task_id("t-1"), true, true)
        .await
        .expect("cleanup succeeds");

    let remaining: Vec<String> = harness
        .orchestrator
        .statuses()
        .await
        .expect("statuses readable")
        .into_iter()
        .map(|report| report.task_id.to_string())
        .collect();
    assert_eq!(remaining, ["t-2"]);
    assert!(
        harness
            .workspaces
            .find(&task_id("t-1"))
            .await
            .expect("workspace query")
            .is_none()
    );
}

/// Agents that capture the stored record whenever implementation starts.
struct PhaseProbe {
    inner: ScriptedTaskAgents,
    store: Arc<Store>,
    seen: Mutex<Vec<(Phase, TaskStatus)>>,
}

#[async_trait]
impl TaskAgents for PhaseProbe {
    async fn plan(&self, spec: &TaskSpecification) -> AgentResult<String> {
        self.inner.plan(spec).await
    }

    async fn implement(&self, spec: &TaskSpecification, plan: &str) -> AgentResult<String> {
        let record = self
            .store
            .load(&task_id("t-1"))
            .await
            .map_err(AgentError::call)?
            .ok_or(AgentError::EmptyOutput)?;
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((record.phase(), record.status()));
        self.inner.implement(spec, plan).await
    }

    async fn write_tests(
        &self,
        spec: &TaskSpecification,
        implementation: &str,
    ) -> AgentResult<String> {
        self.inner.write_tests(spec, implementation).await
    }

    async fn review(
        &self,
        phase: Phase,
        spec: &TaskSpecification,
        artifact: &str,
    ) -> AgentResult<String> {
        self.inner.review(phase, spec, artifact).await
    }

    async fn fix(
        &self,
        phase: Phase,
        spec: &TaskSpecification,
        artifact: &str,
        issues: &[String],
    ) -> AgentResult<String> {
        self.inner.fix(phase, spec, artifact, issues).await
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn phase_is_persisted_before_its_work_starts() {
    let store = Arc::new(InMemoryTaskStateStore::new(Arc::new(DefaultClock)));
    let probe = PhaseProbe {
        inner: ScriptedTaskAgents::new(),
        store: Arc::clone(&store),
        seen: Mutex::new(Vec::new()),
    };
    let harness = harness_with(probe, store, OrchestratorSettings::default());

    harness
        .orchestrator
        .run(request("t-1"))
        .await
        .expect("task completes");

    let seen = harness
        .agents
        .seen
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    assert_eq!(seen, [(Phase::Implementation, TaskStatus::Running)]);
}
