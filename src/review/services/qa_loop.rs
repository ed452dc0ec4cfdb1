//! Iterative review and fix loop with stuck-loop detection.

use crate::review::{
    domain::{IterationRecord, QaOutcome, QaStatus, parse_review, recurring_issues},
    ports::{AgentError, Fixer, IterationObserver, NoopObserver, ObserverError, Reviewer},
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Iteration cap used when none is configured.
pub const DEFAULT_MAX_ITERATIONS: u32 = 50;

/// Errors that abort a QA loop run.
///
/// Non-approval verdicts are not errors; they are reported through
/// [`QaOutcome::status`].
#[derive(Debug, Clone, Error)]
pub enum QaLoopError {
    /// The reviewer call failed.
    #[error("review failed at iteration {iteration}: {source}")]
    Review {
        /// Iteration being reviewed.
        iteration: u32,
        /// Underlying agent failure.
        source: AgentError,
    },

    /// The fixer call failed.
    #[error("fix failed at iteration {iteration}: {source}")]
    Fix {
        /// Iteration whose issues were being fixed.
        iteration: u32,
        /// Underlying agent failure.
        source: AgentError,
    },

    /// The iteration observer rejected a record.
    #[error("recording iteration {iteration} failed: {source}")]
    Observer {
        /// Iteration being recorded.
        iteration: u32,
        /// Underlying observer failure.
        source: ObserverError,
    },
}

/// Review/fix loop bounded by an iteration cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QaLoop {
    max_iterations: u32,
}

impl Default for QaLoop {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITERATIONS)
    }
}

impl QaLoop {
    /// Creates a loop performing at most `max_iterations` review rounds.
    ///
    /// A cap of zero is raised to one so every run reviews at least once.
    #[must_use]
    pub fn new(max_iterations: u32) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
        }
    }

    /// Returns the iteration cap.
    #[must_use]
    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Runs the loop without observing individual iterations.
    ///
    /// # Errors
    ///
    /// Returns [`QaLoopError`] when the reviewer or fixer fails.
    pub async fn run<R, F>(
        &self,
        reviewer: &R,
        fixer: &F,
        initial_artifact: impl Into<String>,
    ) -> Result<QaOutcome, QaLoopError>
    where
        R: Reviewer + ?Sized,
        F: Fixer + ?Sized,
    {
        self.run_observed(reviewer, fixer, initial_artifact, &mut NoopObserver)
            .await
    }

    /// Runs the loop, handing every iteration record to `observer` before
    /// acting on it.
    ///
    /// Each round reviews the current artifact, records the verdict, and then
    /// stops on approval (including a rejection that lists no issues) or on
    /// issues that recur across the current round and the preceding two.
    /// Otherwise the fixer produces the next artifact. When the cap is
    /// reached the outcome carries the fixer's last revision.
    ///
    /// # Errors
    ///
    /// Returns [`QaLoopError`] when the reviewer, fixer, or observer fails.
    pub async fn run_observed<R, F, O>(
        &self,
        reviewer: &R,
        fixer: &F,
        initial_artifact: impl Into<String>,
        observer: &mut O,
    ) -> Result<QaOutcome, QaLoopError>
    where
        R: Reviewer + ?Sized,
        F: Fixer + ?Sized,
        O: IterationObserver + ?Sized,
    {
        let mut artifact = initial_artifact.into();
        let mut history: Vec<IterationRecord> = Vec::new();

        for iteration in 1..=self.max_iterations {
            let output = reviewer
                .review(&artifact)
                .await
                .map_err(|source| QaLoopError::Review { iteration, source })?;
            let verdict = parse_review(&output);
            let record = IterationRecord::from_verdict(iteration, &verdict, &artifact);
            observer
                .on_iteration(&record)
                .await
                .map_err(|source| QaLoopError::Observer { iteration, source })?;
            history.push(record);

            info!(
                iteration,
                approved = verdict.approved(),
                issues = verdict.issues().len(),
                source = %verdict.source(),
                "review round completed"
            );

            if verdict.is_approval() {
                return Ok(QaOutcome::new(QaStatus::Approved, artifact, history));
            }

            let recurring = recurring_issues(&history);
            if !recurring.is_empty() {
                warn!(iteration, recurring = ?recurring, "issues recur across review rounds");
                return Ok(QaOutcome::new(QaStatus::RecurringIssues, artifact, history)
                    .with_recurring(recurring));
            }

            debug!(iteration, "requesting fix");
            artifact = fixer
                .fix(&artifact, verdict.issues())
                .await
                .map_err(|source| QaLoopError::Fix { iteration, source })?;
        }

        warn!(
            max_iterations = self.max_iterations,
            "review loop reached its iteration cap"
        );
        Ok(QaOutcome::new(QaStatus::MaxIterations, artifact, history))
    }
}
