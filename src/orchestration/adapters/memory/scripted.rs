//! Deterministic agent team replaying scripted verdicts.

use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::orchestration::ports::TaskAgents;
use crate::review::ports::{AgentError, AgentResult};
use crate::specification::domain::TaskSpecification;
use crate::task::domain::Phase;

#[derive(Debug, Default)]
struct AgentScript {
    verdicts: BTreeMap<Phase, VecDeque<String>>,
    failing: BTreeSet<Phase>,
    calls: Vec<String>,
}

/// Thread-safe agent team with canned artifacts.
///
/// Authoring calls return `"<step> of <spec name>"`. Reviews pop the next
/// verdict queued for the phase and approve once the queue is empty. Fixes
/// append the addressed issues to the artifact, so every revision differs
/// from the last.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTaskAgents {
    script: Arc<Mutex<AgentScript>>,
}

impl ScriptedTaskAgents {
    /// Creates a team that approves everything on first review.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues review `verdicts` for `phase`, after any already queued.
    #[must_use]
    pub fn with_verdicts<I, S>(self, phase: Phase, verdicts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock()
            .verdicts
            .entry(phase)
            .or_default()
            .extend(verdicts.into_iter().map(Into::into));
        self
    }

    /// Makes the authoring call of `phase` fail with empty output.
    #[must_use]
    pub fn failing_at(self, phase: Phase) -> Self {
        self.lock().failing.insert(phase);
        self
    }

    /// Returns a structured approval verdict.
    #[must_use]
    pub fn approval() -> String {
        json!({ "approved": true, "issues": [] }).to_string()
    }

    /// Returns a structured rejection listing `issues`.
    #[must_use]
    pub fn rejection(issues: &[&str]) -> String {
        json!({ "approved": false, "issues": issues }).to_string()
    }

    /// Returns the calls made so far, such as `plan` or `review:testing`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn author(&self, phase: Phase, step: &str, spec: &TaskSpecification) -> AgentResult<String> {
        let mut script = self.lock();
        script.calls.push(step.to_owned());
        if script.failing.contains(&phase) {
            return Err(AgentError::EmptyOutput);
        }
        Ok(format!("{step} of {}", spec.name()))
    }

    fn lock(&self) -> MutexGuard<'_, AgentScript> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TaskAgents for ScriptedTaskAgents {
    async fn plan(&self, spec: &TaskSpecification) -> AgentResult<String> {
        self.author(Phase::Planning, "plan", spec)
    }

    async fn implement(&self, spec: &TaskSpecification, _plan: &str) -> AgentResult<String> {
        self.author(Phase::Implementation, "implementation", spec)
    }

    async fn write_tests(
        &self,
        spec: &TaskSpecification,
        _implementation: &str,
    ) -> AgentResult<String> {
        self.author(Phase::Testing, "tests", spec)
    }

    async fn review(
        &self,
        phase: Phase,
        _spec: &TaskSpecification,
        _artifact: &str,
    ) -> AgentResult<String> {
        let mut script = self.lock();
        script.calls.push(format!("review:{phase}"));
        let verdict = script
            .verdicts
            .get_mut(&phase)
            .and_then(VecDeque::pop_front);
        Ok(verdict.unwrap_or_else(Self::approval))
    }

    async fn fix(
        &self,
        phase: Phase,
        _spec: &TaskSpecification,
        artifact: &str,
        issues: &[String],
    ) -> AgentResult<String> {
        self.lock().calls.push(format!("fix:{phase}"));
        Ok(format!("{artifact}\nfixed: {}", issues.join("; ")))
    }
}
