//! Terminal results of a QA loop run.

use super::IterationRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Terminal verdict of a QA loop run.
///
/// Only [`QaStatus::Approved`] lets a task proceed; the other verdicts are
/// legitimate outcomes that require operator intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QaStatus {
    /// The reviewer accepted the artifact.
    Approved,
    /// The same issues kept coming back across consecutive iterations.
    RecurringIssues,
    /// The iteration cap was reached without approval.
    MaxIterations,
}

impl QaStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::RecurringIssues => "recurring_issues",
            Self::MaxIterations => "max_iterations",
        }
    }
}

impl fmt::Display for QaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a QA loop run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaOutcome {
    status: QaStatus,
    artifact: String,
    history: Vec<IterationRecord>,
    recurring: BTreeSet<String>,
}

impl QaOutcome {
    /// Creates an outcome without recurring issues.
    #[must_use]
    pub const fn new(status: QaStatus, artifact: String, history: Vec<IterationRecord>) -> Self {
        Self {
            status,
            artifact,
            history,
            recurring: BTreeSet::new(),
        }
    }

    /// Attaches the recurring issue set that stopped the loop.
    #[must_use]
    pub fn with_recurring(mut self, recurring: BTreeSet<String>) -> Self {
        self.recurring = recurring;
        self
    }

    /// Returns the terminal verdict.
    #[must_use]
    pub const fn status(&self) -> QaStatus {
        self.status
    }

    /// Returns whether the loop ended with an approval.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == QaStatus::Approved
    }

    /// Returns the number of review rounds performed.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.history.len()
    }

    /// Returns the last artifact produced by the loop.
    #[must_use]
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Consumes the outcome, returning the final artifact.
    #[must_use]
    pub fn into_artifact(self) -> String {
        self.artifact
    }

    /// Returns one record per review round, oldest first.
    #[must_use]
    pub fn history(&self) -> &[IterationRecord] {
        &self.history
    }

    /// Returns the issues that stopped a recurring-issue verdict.
    #[must_use]
    pub const fn recurring(&self) -> &BTreeSet<String> {
        &self.recurring
    }

    /// Returns the issues of the final review round.
    #[must_use]
    pub fn last_issues(&self) -> &[String] {
        self.history
            .last()
            .map_or(&[][..], |record| record.issues.as_slice())
    }
}
