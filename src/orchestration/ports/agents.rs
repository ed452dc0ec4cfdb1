//! The agent team a task is worked by.

use crate::review::ports::{AgentResult, Fixer, Reviewer};
use crate::specification::domain::TaskSpecification;
use crate::task::domain::Phase;
use async_trait::async_trait;

/// Agents producing, reviewing, and fixing phase artifacts.
///
/// Every call returns a complete artifact or review text; file-level
/// tooling stays inside the implementation.
#[async_trait]
pub trait TaskAgents: Send + Sync {
    /// Drafts an implementation plan for `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::review::ports::AgentError`] when the agent fails.
    async fn plan(&self, spec: &TaskSpecification) -> AgentResult<String>;

    /// Implements `spec` following `plan`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::review::ports::AgentError`] when the agent fails.
    async fn implement(&self, spec: &TaskSpecification, plan: &str) -> AgentResult<String>;

    /// Writes tests covering `implementation`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::review::ports::AgentError`] when the agent fails.
    async fn write_tests(
        &self,
        spec: &TaskSpecification,
        implementation: &str,
    ) -> AgentResult<String>;

    /// Reviews the `phase` artifact, answering with a verdict.
    ///
    /// # Errors
    ///
    /// Returns [`crate::review::ports::AgentError`] when the agent fails.
    async fn review(
        &self,
        phase: Phase,
        spec: &TaskSpecification,
        artifact: &str,
    ) -> AgentResult<String>;

    /// Revises the `phase` artifact to address `issues`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::review::ports::AgentError`] when the agent fails.
    async fn fix(
        &self,
        phase: Phase,
        spec: &TaskSpecification,
        artifact: &str,
        issues: &[String],
    ) -> AgentResult<String>;
}

/// Binds a [`TaskAgents`] team to one phase of one task, giving the QA
/// loop its reviewer and fixer.
#[derive(Debug)]
pub struct PhaseAgents<'a, A: ?Sized> {
    agents: &'a A,
    spec: &'a TaskSpecification,
    phase: Phase,
}

impl<'a, A: ?Sized> PhaseAgents<'a, A> {
    /// Binds `agents` to `phase` of the task described by `spec`.
    #[must_use]
    pub const fn new(agents: &'a A, spec: &'a TaskSpecification, phase: Phase) -> Self {
        Self {
            agents,
            spec,
            phase,
        }
    }
}

#[async_trait]
impl<A> Reviewer for PhaseAgents<'_, A>
where
    A: TaskAgents + ?Sized,
{
    async fn review(&self, artifact: &str) -> AgentResult<String> {
        self.agents.review(self.phase, self.spec, artifact).await
    }
}

#[async_trait]
impl<A> Fixer for PhaseAgents<'_, A>
where
    A: TaskAgents + ?Sized,
{
    async fn fix(&self, artifact: &str, issues: &[String]) -> AgentResult<String> {
        self.agents
            .fix(self.phase, self.spec, artifact, issues)
            .await
    }
}
