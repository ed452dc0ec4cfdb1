//! Operator-facing summary of a task.

use crate::task::domain::{Phase, TaskId, TaskRecord, TaskStatus};
use std::fmt;

/// Where a task stands, with the issues of its most recent review round.
///
/// # Examples
///
///     use multiagent::orchestration::domain::TaskReport;
///     use multiagent::task::domain::{Phase, TaskId, TaskRecord, TaskStatus};
///
///     let record = TaskRecord::new(TaskId::new("t-1").expect("valid id"), "login");
///     let report = TaskReport::from_record(&record);
///     assert_eq!(report.phase, Phase::Planning);
///     assert_eq!(report.status, TaskStatus::Pending);
///     assert!(report.last_issues.is_empty());
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// Task being reported.
    pub task_id: TaskId,
    /// Specification the task implements.
    pub spec_name: String,
    /// Current phase.
    pub phase: Phase,
    /// Current run status.
    pub status: TaskStatus,
    /// Iterations recorded in the current phase.
    pub iteration: u32,
    /// Issues raised by the most recent review round.
    pub last_issues: Vec<String>,
    /// Phase and message of the fatal error, for failed tasks.
    pub failure: Option<(Phase, String)>,
}

impl TaskReport {
    /// Summarizes `record`.
    #[must_use]
    pub fn from_record(record: &TaskRecord) -> Self {
        Self {
            task_id: record.task_id().clone(),
            spec_name: record.spec_name().to_owned(),
            phase: record.phase(),
            status: record.status(),
            iteration: record.iteration(),
            last_issues: record.last_issues().to_vec(),
            failure: record
                .failure()
                .map(|failure| (failure.phase, failure.message.clone())),
        }
    }

    /// Returns whether the task finished successfully.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

impl fmt::Display for TaskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Task: {}", self.task_id)?;
        writeln!(f, "Spec: {}", self.spec_name)?;
        writeln!(f, "Phase: {}", self.phase)?;
        writeln!(f, "Status: {}", self.status)?;
        write!(f, "Iteration: {}", self.iteration)?;
        if let Some((phase, message)) = &self.failure {
            write!(f, "\nFailed during {phase}: {message}")?;
        }
        if !self.last_issues.is_empty() {
            write!(f, "\nLast issues:")?;
            for issue in &self.last_issues {
                write!(f, "\n  - {issue}")?;
            }
        }
        Ok(())
    }
}
