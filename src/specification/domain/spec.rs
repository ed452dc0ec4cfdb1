//! The task specification document.

use serde::{Deserialize, Serialize};

/// Immutable description of the work a task performs.
///
/// Only `name` is required when decoding; every list defaults to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpecification {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    requirements: Vec<String>,
    #[serde(default)]
    constraints: Vec<String>,
    #[serde(default)]
    acceptance_criteria: Vec<String>,
    #[serde(default)]
    files_to_modify: Vec<String>,
    #[serde(default)]
    files_to_create: Vec<String>,
    #[serde(default)]
    tests_required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl TaskSpecification {
    /// Creates a specification with empty lists.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            requirements: Vec::new(),
            constraints: Vec::new(),
            acceptance_criteria: Vec::new(),
            files_to_modify: Vec::new(),
            files_to_create: Vec::new(),
            tests_required: Vec::new(),
            notes: None,
        }
    }

    /// Sets the requirements.
    #[must_use]
    pub fn with_requirements(mut self, requirements: impl IntoIterator<Item = String>) -> Self {
        self.requirements = requirements.into_iter().collect();
        self
    }

    /// Sets the acceptance criteria.
    #[must_use]
    pub fn with_acceptance_criteria(
        mut self,
        criteria: impl IntoIterator<Item = String>,
    ) -> Self {
        self.acceptance_criteria = criteria.into_iter().collect();
        self
    }

    /// Returns the specification's declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the functional requirements.
    #[must_use]
    pub fn requirements(&self) -> &[String] {
        &self.requirements
    }

    /// Returns the constraints the work must respect.
    #[must_use]
    pub fn constraints(&self) -> &[String] {
        &self.constraints
    }

    /// Returns the acceptance criteria.
    #[must_use]
    pub fn acceptance_criteria(&self) -> &[String] {
        &self.acceptance_criteria
    }

    /// Returns the files expected to change.
    #[must_use]
    pub fn files_to_modify(&self) -> &[String] {
        &self.files_to_modify
    }

    /// Returns the files expected to be created.
    #[must_use]
    pub fn files_to_create(&self) -> &[String] {
        &self.files_to_create
    }

    /// Returns the tests the work must include.
    #[must_use]
    pub fn tests_required(&self) -> &[String] {
        &self.tests_required
    }

    /// Returns additional notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}
