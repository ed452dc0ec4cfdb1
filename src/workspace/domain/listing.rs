//! Parser for `git worktree list --porcelain` output.

use super::TASK_BRANCH_PREFIX;
use crate::task::domain::TaskId;
use camino::{Utf8Path, Utf8PathBuf};

const HEADS_PREFIX: &str = "refs/heads/";

/// One worktree reported by the isolation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeEntry {
    path: Utf8PathBuf,
    head: Option<String>,
    branch: Option<String>,
    detached: bool,
}

impl WorktreeEntry {
    /// Creates an entry for the worktree at `path` with no branch.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            head: None,
            branch: None,
            detached: false,
        }
    }

    /// Sets the checked-out branch reference.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Returns the worktree directory.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the checked-out commit, when reported.
    #[must_use]
    pub fn head(&self) -> Option<&str> {
        self.head.as_deref()
    }

    /// Returns the branch reference exactly as reported, such as
    /// `refs/heads/main`.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Returns the branch name without the `refs/heads/` prefix.
    #[must_use]
    pub fn branch_name(&self) -> Option<&str> {
        self.branch
            .as_deref()
            .map(|branch| branch.strip_prefix(HEADS_PREFIX).unwrap_or(branch))
    }

    /// Returns whether the worktree has a detached `HEAD`.
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.detached
    }

    /// Returns the task owning this worktree when it sits on a task branch.
    #[must_use]
    pub fn task_id(&self) -> Option<TaskId> {
        self.branch_name()
            .and_then(|name| name.strip_prefix(TASK_BRANCH_PREFIX))
            .and_then(|raw| TaskId::new(raw).ok())
    }
}

/// Parses porcelain worktree listing text.
///
/// Records are runs of `key value` lines separated by blank lines; each
/// starts with `worktree <path>`. The final record does not need a trailing
/// blank line. Unknown keys are ignored, and lines before the first
/// `worktree` line are skipped.
///
/// # Examples
///
///     use multiagent::workspace::domain::parse_worktree_porcelain;
///
///     let entries = parse_worktree_porcelain(
///         "worktree /repo\nbranch refs/heads/main\n\nworktree /wt/a\nbranch refs/heads/task/a",
///     );
///     assert_eq!(entries.len(), 2);
///     assert_eq!(entries[1].branch_name(), Some("task/a"));
#[must_use]
pub fn parse_worktree_porcelain(text: &str) -> Vec<WorktreeEntry> {
    let mut entries = Vec::new();
    let mut current: Option<WorktreeEntry> = None;

    for line in text.lines() {
        let trimmed = line.trim_end_matches('\r');
        if trimmed.is_empty() {
            entries.extend(current.take());
            continue;
        }
        let (key, value) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
        if key == "worktree" {
            entries.extend(current.replace(WorktreeEntry::new(value)));
            continue;
        }
        let Some(entry) = current.as_mut() else {
            continue;
        };
        match key {
            "HEAD" => entry.head = Some(value.to_owned()),
            "branch" => entry.branch = Some(value.to_owned()),
            "detached" => entry.detached = true,
            _ => {}
        }
    }
    entries.extend(current);
    entries
}
