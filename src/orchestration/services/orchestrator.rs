//! Phase state machine driving one task from planning to merge.

use super::{OrchestrationError, OrchestrationResult};
use crate::orchestration::{
    domain::{PhaseArtifact, TaskReport, checkpoint_message},
    ports::{PhaseAgents, TaskAgents},
};
use crate::review::{
    domain::{IterationRecord, QaStatus},
    ports::{IterationObserver, ObserverError},
    services::{DEFAULT_MAX_ITERATIONS, QaLoop},
};
use crate::specification::{
    domain::{SpecName, TaskSpecification},
    ports::SpecificationCatalogue,
};
use crate::task::{
    domain::{Phase, TaskId, TaskRecord},
    ports::TaskStateStore,
};
use crate::workspace::{
    domain::{BranchName, Workspace},
    ports::WorkspaceManager,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Settings shared by every task an orchestrator drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorSettings {
    max_iterations: u32,
    base_branch: BranchName,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS, BranchName::main())
    }
}

impl OrchestratorSettings {
    /// Creates settings with a QA iteration cap and the branch tasks start
    /// from and merge back into.
    #[must_use]
    pub const fn new(max_iterations: u32, base_branch: BranchName) -> Self {
        Self {
            max_iterations,
            base_branch,
        }
    }

    /// Returns the QA iteration cap.
    #[must_use]
    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Returns the base branch.
    #[must_use]
    pub const fn base_branch(&self) -> &BranchName {
        &self.base_branch
    }
}

/// Request to start a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTaskRequest {
    spec_name: SpecName,
    task_id: Option<TaskId>,
    max_iterations: Option<u32>,
}

impl RunTaskRequest {
    /// Creates a request for the specification called `spec_name`.
    #[must_use]
    pub const fn new(spec_name: SpecName) -> Self {
        Self {
            spec_name,
            task_id: None,
            max_iterations: None,
        }
    }

    /// Uses `task_id` instead of a generated identifier.
    #[must_use]
    pub fn with_task_id(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Overrides the QA iteration cap for this run.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }
}

/// Inputs fixed for the duration of one drive of a task.
#[derive(Clone, Copy)]
struct TaskRun<'a> {
    workspace: &'a Workspace,
    spec: &'a TaskSpecification,
    qa: QaLoop,
}

/// Saves the task record after every QA iteration.
struct PersistingObserver<'a, S: ?Sized> {
    store: &'a S,
    record: &'a mut TaskRecord,
}

#[async_trait]
impl<S> IterationObserver for PersistingObserver<'_, S>
where
    S: TaskStateStore + ?Sized,
{
    async fn on_iteration(&mut self, iteration: &IterationRecord) -> Result<(), ObserverError> {
        self.record.record_iteration(iteration.clone());
        self.store
            .save(self.record)
            .await
            .map_err(ObserverError::new)
    }
}

/// Drives tasks through the phase state machine.
///
/// Each phase is persisted before its work starts. Implementation, testing,
/// and the final review run a QA loop whose iterations are saved as they
/// happen; a non-approving verdict blocks the task. Merge stages the task
/// branch onto the base branch without committing. Fatal errors during
/// phase work move the task into the failed state before being returned,
/// while storage failures are returned with the last saved record left as
/// the resume point.
#[derive(Clone)]
pub struct TaskOrchestrator<S, W, A, C>
where
    S: TaskStateStore,
    W: WorkspaceManager,
    A: TaskAgents,
    C: SpecificationCatalogue,
{
    store: Arc<S>,
    workspaces: Arc<W>,
    agents: Arc<A>,
    specs: Arc<C>,
    settings: OrchestratorSettings,
}

impl<S, W, A, C> TaskOrchestrator<S, W, A, C>
where
    S: TaskStateStore,
    W: WorkspaceManager,
    A: TaskAgents,
    C: SpecificationCatalogue,
{
    /// Creates an orchestrator over its collaborators.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        workspaces: Arc<W>,
        agents: Arc<A>,
        specs: Arc<C>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            store,
            workspaces,
            agents,
            specs,
            settings,
        }
    }

    /// Returns the orchestrator settings.
    #[must_use]
    pub const fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Starts a task for the requested specification and drives it until
    /// it is done or blocked.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::TaskExists`] when the identifier is
    /// taken, a specification error when the specification cannot be
    /// loaded, or the fatal error that failed the task.
    pub async fn run(&self, request: RunTaskRequest) -> OrchestrationResult<TaskReport> {
        let spec = self.specs.load(&request.spec_name).await?;
        let task_id = request
            .task_id
            .unwrap_or_else(|| TaskId::generate(request.spec_name.as_str()));
        if self.store.exists(&task_id).await? {
            return Err(OrchestrationError::TaskExists(task_id));
        }

        let mut record = TaskRecord::new(task_id.clone(), request.spec_name.as_str());
        if let Some(max_iterations) = request.max_iterations {
            record = record.with_max_iterations(max_iterations);
        }
        self.store.save(&mut record).await?;
        info!(task_id = %task_id, spec = %request.spec_name, "task created");

        let workspace = self.open_workspace(&mut record).await?;
        let run = TaskRun {
            workspace: &workspace,
            spec: &spec,
            qa: self.qa_loop(&record),
        };
        self.drive(record, run).await
    }

    /// Re-enters the state machine at the recorded phase of `task_id`.
    ///
    /// A finished task is reported without further work. A blocked task is
    /// reviewed again from the artifact left in its workspace, under the
    /// iteration cap it was started with.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::TaskNotFound`] when no record exists,
    /// [`OrchestrationError::WorkspaceMissing`] when the workspace was
    /// destroyed, or the fatal error that failed the task.
    pub async fn resume(&self, task_id: &TaskId) -> OrchestrationResult<TaskReport> {
        let mut record = self
            .store
            .load(task_id)
            .await?
            .ok_or_else(|| OrchestrationError::TaskNotFound(task_id.clone()))?;
        if record.phase().is_terminal() {
            info!(task_id = %task_id, phase = %record.phase(), "task already finished");
            return Ok(TaskReport::from_record(&record));
        }

        let spec = match self.load_spec(&record).await {
            Ok(spec) => spec,
            Err(err) => return Err(self.abort(&mut record, err).await),
        };
        let workspace = if record.worktree_path().is_none() {
            self.open_workspace(&mut record).await?
        } else {
            match self.workspaces.find(task_id).await {
                Ok(Some(workspace)) => workspace,
                Ok(None) => {
                    let err = OrchestrationError::WorkspaceMissing(task_id.clone());
                    return Err(self.abort(&mut record, err).await);
                }
                Err(err) => return Err(self.abort(&mut record, err.into()).await),
            }
        };
        info!(task_id = %task_id, phase = %record.phase(), "resuming task");
        let run = TaskRun {
            workspace: &workspace,
            spec: &spec,
            qa: self.qa_loop(&record),
        };
        self.drive(record, run).await
    }

    /// Reports the task `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::TaskNotFound`] when no record exists.
    pub async fn status(&self, task_id: &TaskId) -> OrchestrationResult<TaskReport> {
        self.store
            .load(task_id)
            .await?
            .map(|record| TaskReport::from_record(&record))
            .ok_or_else(|| OrchestrationError::TaskNotFound(task_id.clone()))
    }

    /// Reports every stored task in identifier order.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::State`] when the store cannot be read.
    pub async fn statuses(&self) -> OrchestrationResult<Vec<TaskReport>> {
        let mut reports = Vec::new();
        for task_id in self.store.list_tasks().await? {
            if let Some(record) = self.store.load(&task_id).await? {
                reports.push(TaskReport::from_record(&record));
            }
        }
        Ok(reports)
    }

    /// Removes the workspace of `task_id`, optionally with its branch, and
    /// with `forget` its task record.
    ///
    /// # Errors
    ///
    /// Returns a workspace or storage error when removal fails.
    pub async fn cleanup(
        &self,
        task_id: &TaskId,
        delete_branch: bool,
        forget: bool,
    ) -> OrchestrationResult<()> {
        self.workspaces.cleanup(task_id, delete_branch).await?;
        if forget {
            self.store.delete(task_id).await?;
        }
        info!(task_id = %task_id, delete_branch, forget, "task cleaned up");
        Ok(())
    }

    fn qa_loop(&self, record: &TaskRecord) -> QaLoop {
        QaLoop::new(
            record
                .max_iterations()
                .unwrap_or(self.settings.max_iterations),
        )
    }

    async fn load_spec(&self, record: &TaskRecord) -> OrchestrationResult<TaskSpecification> {
        let name = SpecName::new(record.spec_name())?;
        Ok(self.specs.load(&name).await?)
    }

    async fn open_workspace(&self, record: &mut TaskRecord) -> OrchestrationResult<Workspace> {
        let workspace = match self
            .workspaces
            .create(record.task_id(), &self.settings.base_branch)
            .await
        {
            Ok(workspace) => workspace,
            Err(err) => return Err(self.abort(record, err.into()).await),
        };
        record.attach_workspace(workspace.path(), workspace.branch().as_str());
        self.store.save(record).await?;
        Ok(workspace)
    }

    async fn drive(
        &self,
        mut record: TaskRecord,
        run: TaskRun<'_>,
    ) -> OrchestrationResult<TaskReport> {
        loop {
            let phase = record.phase();
            record.enter_phase(phase)?;
            self.store.save(&mut record).await?;
            info!(task_id = %record.task_id(), phase = %phase, "entered phase");

            match self.run_phase(&mut record, phase, run).await {
                Ok(None) => {
                    let Some(next) = phase.successor() else {
                        break;
                    };
                    record.enter_phase(next)?;
                    if next.is_terminal() {
                        self.store.save(&mut record).await?;
                        info!(task_id = %record.task_id(), "task done");
                        break;
                    }
                }
                Ok(Some(verdict)) => {
                    record.block()?;
                    self.store.save(&mut record).await?;
                    warn!(
                        task_id = %record.task_id(),
                        phase = %phase,
                        verdict = %verdict,
                        issues = record.last_issues().len(),
                        "task blocked"
                    );
                    break;
                }
                Err(err) => return Err(self.abort(&mut record, err).await),
            }
        }
        Ok(TaskReport::from_record(&record))
    }

    /// Performs the work of `phase`, returning the verdict that blocks the
    /// task, if any.
    async fn run_phase(
        &self,
        record: &mut TaskRecord,
        phase: Phase,
        run: TaskRun<'_>,
    ) -> OrchestrationResult<Option<QaStatus>> {
        let TaskRun {
            workspace,
            spec,
            ..
        } = run;
        match phase {
            Phase::Planning => {
                let plan = self.agents.plan(spec).await?;
                self.store_artifact(workspace, PhaseArtifact::Plan, &plan)
                    .await?;
                Ok(None)
            }
            Phase::Implementation => {
                let draft = match self.read(workspace, PhaseArtifact::Implementation).await? {
                    Some(existing) => existing,
                    None => {
                        let plan = self.require(workspace, PhaseArtifact::Plan).await?;
                        self.agents.implement(spec, &plan).await?
                    }
                };
                self.review_artifact(record, PhaseArtifact::Implementation, draft, run)
                    .await
            }
            Phase::Testing => {
                let draft = match self.read(workspace, PhaseArtifact::Tests).await? {
                    Some(existing) => existing,
                    None => {
                        let implementation = self
                            .require(workspace, PhaseArtifact::Implementation)
                            .await?;
                        self.agents.write_tests(spec, &implementation).await?
                    }
                };
                self.review_artifact(record, PhaseArtifact::Tests, draft, run)
                    .await
            }
            Phase::Review => {
                let draft = match self.read(workspace, PhaseArtifact::Review).await? {
                    Some(existing) => existing,
                    None => {
                        let implementation = self
                            .require(workspace, PhaseArtifact::Implementation)
                            .await?;
                        let tests = self.require(workspace, PhaseArtifact::Tests).await?;
                        format!("## Implementation\n\n{implementation}\n\n## Tests\n\n{tests}\n")
                    }
                };
                self.review_artifact(record, PhaseArtifact::Review, draft, run)
                    .await
            }
            Phase::Merge => {
                self.workspaces
                    .checkpoint(workspace, &checkpoint_message(record.task_id(), "merge"))
                    .await?;
                self.workspaces
                    .merge_back(record.task_id(), &self.settings.base_branch, true)
                    .await?;
                info!(
                    task_id = %record.task_id(),
                    target = %self.settings.base_branch,
                    "merge staged for review"
                );
                Ok(None)
            }
            Phase::Done | Phase::Failed => Ok(None),
        }
    }

    async fn review_artifact(
        &self,
        record: &mut TaskRecord,
        artifact: PhaseArtifact,
        draft: String,
        run: TaskRun<'_>,
    ) -> OrchestrationResult<Option<QaStatus>> {
        let workspace = run.workspace;
        let agents = PhaseAgents::new(self.agents.as_ref(), run.spec, record.phase());
        let mut observer = PersistingObserver {
            store: self.store.as_ref(),
            record,
        };
        let outcome = run
            .qa
            .run_observed(&agents, &agents, draft, &mut observer)
            .await?;
        self.store_artifact(workspace, artifact, outcome.artifact())
            .await?;
        if outcome.is_approved() {
            return Ok(None);
        }
        if !outcome.recurring().is_empty() {
            warn!(
                task_id = %workspace.task_id(),
                recurring = ?outcome.recurring(),
                "review keeps raising the same issues"
            );
        }
        Ok(Some(outcome.status()))
    }

    async fn read(
        &self,
        workspace: &Workspace,
        artifact: PhaseArtifact,
    ) -> OrchestrationResult<Option<String>> {
        Ok(self
            .workspaces
            .read_artifact(workspace, &artifact.path()?)
            .await?)
    }

    async fn require(
        &self,
        workspace: &Workspace,
        artifact: PhaseArtifact,
    ) -> OrchestrationResult<String> {
        self.read(workspace, artifact)
            .await?
            .ok_or_else(|| OrchestrationError::ArtifactMissing {
                task_id: workspace.task_id().clone(),
                artifact,
            })
    }

    async fn store_artifact(
        &self,
        workspace: &Workspace,
        artifact: PhaseArtifact,
        contents: &str,
    ) -> OrchestrationResult<()> {
        self.workspaces
            .write_artifact(workspace, &artifact.path()?, contents)
            .await?;
        let committed = self
            .workspaces
            .checkpoint(workspace, &artifact.checkpoint_message(workspace.task_id()))
            .await?;
        info!(
            task_id = %workspace.task_id(),
            artifact = %artifact,
            committed,
            "artifact checkpointed"
        );
        Ok(())
    }

    /// Moves the task into the failed state and returns `err`.
    async fn abort(&self, record: &mut TaskRecord, err: OrchestrationError) -> OrchestrationError {
        error!(
            task_id = %record.task_id(),
            phase = %record.phase(),
            error = %err,
            "task failed"
        );
        if let Err(domain) = record.fail(err.to_string()) {
            warn!(task_id = %record.task_id(), error = %domain, "task already finished");
            return err;
        }
        if let Err(save) = self.store.save(record).await {
            error!(task_id = %record.task_id(), error = %save, "failed to persist task failure");
        }
        err
    }
}
