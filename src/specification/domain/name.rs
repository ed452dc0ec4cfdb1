//! Specification names.

use super::SpecificationDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_SPEC_NAME_LENGTH: usize = 100;

/// Name of a specification, used as its file stem.
///
/// Names are restricted to ASCII letters, digits, `.`, `_`, and `-`, and
/// must not start with a dot.
///
/// # Examples
///
///     use multiagent::specification::domain::SpecName;
///
///     assert!(SpecName::new("add-login").is_ok());
///     assert!(SpecName::new("../secrets").is_err());
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpecName(String);

impl SpecName {
    /// Creates a validated specification name.
    ///
    /// # Errors
    ///
    /// Returns [`SpecificationDomainError::InvalidName`] when the name is
    /// empty, too long, starts with a dot, or contains other characters.
    pub fn new(value: impl Into<String>) -> Result<Self, SpecificationDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let permitted = trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'));
        if trimmed.is_empty()
            || trimmed.len() > MAX_SPEC_NAME_LENGTH
            || trimmed.starts_with('.')
            || !permitted
        {
            return Err(SpecificationDomainError::InvalidName(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpecName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SpecName {
    type Error = SpecificationDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SpecName> for String {
    fn from(value: SpecName) -> Self {
        value.0
    }
}
