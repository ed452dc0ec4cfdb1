//! Identifier types for the task domain.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length of a task identifier.
///
/// Identifiers become file names (`<id>.json`), directory names, and the
/// `task/<id>` branch suffix, so they are kept well below common path limits.
const MAX_TASK_ID_LENGTH: usize = 100;

/// Length of the random suffix appended by [`TaskId::generate`].
const GENERATED_SUFFIX_LENGTH: usize = 8;

/// Externally supplied, globally unique task identifier.
///
/// Task identifiers are restricted to ASCII letters, digits, `.`, `_`, and
/// `-`, must not start with a dot, and must not end with `.lock`, so the same
/// value is valid as a file name and as a Git ref component.
///
/// # Examples
///
///     use multiagent::task::domain::TaskId;
///
///     let id = TaskId::new("add-auth-1").expect("valid");
///     assert_eq!(id.as_str(), "add-auth-1");
///     assert!(TaskId::new("../escape").is_err());
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Creates a validated task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTaskId`] when the value is empty,
    /// too long, or contains characters outside the permitted set.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if Self::is_invalid(normalized) {
            return Err(TaskDomainError::InvalidTaskId(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Generates an identifier for a run of the named specification.
    ///
    /// The specification name is reduced to alphanumerics, `_` and `-`, and
    /// suffixed with eight random hexadecimal characters.
    #[must_use]
    pub fn generate(spec_name: &str) -> Self {
        let slug: String = spec_name
            .trim()
            .chars()
            .map(|ch| if is_permitted(ch) && ch != '.' { ch } else { '-' })
            .skip_while(|ch| *ch == '-')
            .take(MAX_TASK_ID_LENGTH - GENERATED_SUFFIX_LENGTH - 1)
            .collect();
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(GENERATED_SUFFIX_LENGTH)
            .collect();

        if slug.is_empty() {
            Self(format!("task-{suffix}"))
        } else {
            Self(format!("{slug}-{suffix}"))
        }
    }

    fn is_invalid(value: &str) -> bool {
        let is_empty = value.is_empty();
        let exceeds_length_limit = value.len() > MAX_TASK_ID_LENGTH;
        let has_forbidden_char = !value.chars().all(is_permitted);
        let is_hidden = value.starts_with('.');
        let is_lock_name = value.ends_with(".lock");
        let has_double_dot = value.contains("..");

        is_empty
            || exceeds_length_limit
            || has_forbidden_char
            || is_hidden
            || is_lock_name
            || has_double_dot
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const fn is_permitted(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-')
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TaskId {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TaskId {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.0
    }
}
