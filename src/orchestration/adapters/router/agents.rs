//! Task agents answering through role-routed model calls.

use super::prompts::{
    implement_request, plan_request, review_request, system_prompt, tests_request,
};
use crate::orchestration::ports::TaskAgents;
use crate::review::{
    domain::fix_request,
    ports::{AgentError, AgentResult},
};
use crate::routing::{
    domain::{AgentRole, CompletionRequest},
    ports::CompletionProvider,
    services::ModelRouter,
};
use crate::specification::domain::TaskSpecification;
use crate::task::domain::Phase;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Agent team whose every member is a model behind a [`ModelRouter`].
///
/// Planning goes to the architect, implementation to the coder, tests to
/// the tester, and verdicts to the reviewer. Fixes go back to whichever
/// role wrote the artifact.
pub struct RouterTaskAgents<P>
where
    P: CompletionProvider,
{
    router: Arc<ModelRouter<P>>,
}

impl<P> RouterTaskAgents<P>
where
    P: CompletionProvider,
{
    /// Creates a team sharing `router`.
    #[must_use]
    pub const fn new(router: Arc<ModelRouter<P>>) -> Self {
        Self { router }
    }

    async fn ask(&self, role: AgentRole, prompt: String) -> AgentResult<String> {
        let request = CompletionRequest::prompt(system_prompt(role), prompt);
        let completion = self
            .router
            .complete_for_role(role.as_str(), &request)
            .await
            .map_err(AgentError::call)?;
        debug!(
            role = %role,
            model = %completion.model,
            chars = completion.content.len(),
            "agent replied"
        );
        let content = completion.content.trim();
        if content.is_empty() {
            return Err(AgentError::EmptyOutput);
        }
        Ok(content.to_owned())
    }
}

const fn author_of(phase: Phase) -> AgentRole {
    match phase {
        Phase::Planning => AgentRole::Architect,
        Phase::Testing => AgentRole::Tester,
        Phase::Implementation | Phase::Review | Phase::Merge | Phase::Done | Phase::Failed => {
            AgentRole::Coder
        }
    }
}

#[async_trait]
impl<P> TaskAgents for RouterTaskAgents<P>
where
    P: CompletionProvider,
{
    async fn plan(&self, spec: &TaskSpecification) -> AgentResult<String> {
        let prompt = plan_request(spec).map_err(AgentError::call)?;
        self.ask(AgentRole::Architect, prompt).await
    }

    async fn implement(&self, spec: &TaskSpecification, plan: &str) -> AgentResult<String> {
        let prompt = implement_request(spec, plan).map_err(AgentError::call)?;
        self.ask(AgentRole::Coder, prompt).await
    }

    async fn write_tests(
        &self,
        spec: &TaskSpecification,
        implementation: &str,
    ) -> AgentResult<String> {
        let prompt = tests_request(spec, implementation).map_err(AgentError::call)?;
        self.ask(AgentRole::Tester, prompt).await
    }

    async fn review(
        &self,
        phase: Phase,
        spec: &TaskSpecification,
        artifact: &str,
    ) -> AgentResult<String> {
        let prompt = review_request(phase, spec, artifact).map_err(AgentError::call)?;
        self.ask(AgentRole::Reviewer, prompt).await
    }

    async fn fix(
        &self,
        phase: Phase,
        _spec: &TaskSpecification,
        artifact: &str,
        issues: &[String],
    ) -> AgentResult<String> {
        let prompt = fix_request(artifact, issues).map_err(AgentError::call)?;
        self.ask(author_of(phase), prompt).await
    }
}
