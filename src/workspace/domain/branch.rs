//! Branch-name value object.

use super::WorkspaceDomainError;
use crate::task::domain::TaskId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every task branch.
pub const TASK_BRANCH_PREFIX: &str = "task/";

/// Integration branch used when none is configured.
pub const DEFAULT_BASE_BRANCH: &str = "main";

const MAX_BRANCH_NAME_LENGTH: usize = 200;
const FORBIDDEN_CHARS: [char; 9] = [' ', '~', '^', ':', '?', '*', '[', '\\', '\t'];

/// Validated Git branch name.
///
/// Names must be non-empty after trimming, must not start with `-` or `/`,
/// end with `/`, `.` or `.lock`, contain `..`, `@{`, `//`, or any of the
/// characters Git reserves for revision syntax.
///
/// # Examples
///
///     use multiagent::task::domain::TaskId;
///     use multiagent::workspace::domain::BranchName;
///
///     let task_id = TaskId::new("login-form").expect("valid task id");
///     assert_eq!(BranchName::for_task(&task_id).as_str(), "task/login-form");
///     assert!(BranchName::new("main").is_ok());
///     assert!(BranchName::new("bad..name").is_err());
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Creates a validated branch name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceDomainError::InvalidBranchName`] when the value
    /// violates Git's reference naming rules.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkspaceDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if Self::is_invalid_branch_name(normalized) {
            return Err(WorkspaceDomainError::InvalidBranchName(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the default integration branch, `main`.
    #[must_use]
    pub fn main() -> Self {
        Self(DEFAULT_BASE_BRANCH.to_owned())
    }

    /// Returns the dedicated branch of `task_id`.
    #[must_use]
    pub fn for_task(task_id: &TaskId) -> Self {
        Self(format!("{TASK_BRANCH_PREFIX}{task_id}"))
    }

    fn is_invalid_branch_name(name: &str) -> bool {
        let is_empty = name.is_empty();
        let exceeds_length_limit = name.len() > MAX_BRANCH_NAME_LENGTH;
        let has_forbidden_char = name
            .chars()
            .any(|ch| ch.is_control() || FORBIDDEN_CHARS.contains(&ch));
        let has_bad_sequence = ["..", "@{", "//"].iter().any(|seq| name.contains(seq));
        let has_bad_start = name.starts_with('-') || name.starts_with('/');
        let has_bad_end = name.ends_with('/') || name.ends_with('.') || name.ends_with(".lock");

        is_empty
            || exceeds_length_limit
            || has_forbidden_char
            || has_bad_sequence
            || has_bad_start
            || has_bad_end
    }

    /// Returns the branch name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the fully qualified `refs/heads/` reference.
    #[must_use]
    pub fn to_ref(&self) -> String {
        format!("refs/heads/{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BranchName {
    type Error = WorkspaceDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for BranchName {
    type Error = WorkspaceDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BranchName> for String {
    fn from(value: BranchName) -> Self {
        value.0
    }
}
