//! Catalogue of `<name>.yaml` specification files.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use minijinja::{Environment, context};
use mockable::Clock;
use std::io::{self, Write};
use std::sync::Arc;

use crate::specification::{
    domain::{SpecName, TaskSpecification},
    ports::{SpecificationCatalogue, SpecificationError, SpecificationResult},
};

const SPEC_EXTENSION: &str = ".yaml";

const SPEC_TEMPLATE: &str = "\
# Task Specification: {{ name }}
# Created: {{ created }}

name: {{ name }}
description: |
  Brief description of the task

requirements:
  - Requirement 1
  - Requirement 2
  - Requirement 3

constraints:
  - No breaking changes
  - Maintain test coverage
  - Follow existing code style

acceptance_criteria:
  - Criterion 1
  - Criterion 2
  - Criterion 3

files_to_modify:
  - path/to/file1.py
  - path/to/file2.py

files_to_create:
  - path/to/new_file.py

tests_required:
  - Unit tests for new functionality
  - Integration tests if needed

notes: |
  Additional context or notes
";

/// Specification catalogue backed by a directory of YAML documents.
#[derive(Debug, Clone)]
pub struct FileSpecificationCatalogue<C>
where
    C: Clock + Send + Sync,
{
    root: Utf8PathBuf,
    clock: Arc<C>,
}

impl<C> FileSpecificationCatalogue<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a catalogue over the directory `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>, clock: Arc<C>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    /// Returns the catalogue directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn open_root(&self) -> io::Result<Option<Dir>> {
        match Dir::open_ambient_dir(&self.root, ambient_authority()) {
            Ok(dir) => Ok(Some(dir)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn render_template(&self, name: &SpecName) -> SpecificationResult<String> {
        Environment::new()
            .render_str(
                SPEC_TEMPLATE,
                context! { name => name.as_str(), created => self.clock.utc().to_rfc3339() },
            )
            .map_err(SpecificationError::persistence)
    }
}

fn file_name(name: &SpecName) -> String {
    format!("{name}{SPEC_EXTENSION}")
}

#[async_trait]
impl<C> SpecificationCatalogue for FileSpecificationCatalogue<C>
where
    C: Clock + Send + Sync,
{
    async fn create_template(&self, name: &SpecName) -> SpecificationResult<Utf8PathBuf> {
        let contents = self.render_template(name)?;
        std::fs::create_dir_all(&self.root).map_err(SpecificationError::persistence)?;
        let dir = Dir::open_ambient_dir(&self.root, ambient_authority())
            .map_err(SpecificationError::persistence)?;
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let mut file = match dir.open_with(file_name(name), &options) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(SpecificationError::AlreadyExists(name.clone()));
            }
            Err(err) => return Err(SpecificationError::persistence(err)),
        };
        file.write_all(contents.as_bytes())
            .map_err(SpecificationError::persistence)?;
        Ok(self.root.join(file_name(name)))
    }

    async fn list(&self) -> SpecificationResult<Vec<SpecName>> {
        let Some(dir) = self.open_root().map_err(SpecificationError::persistence)? else {
            return Ok(Vec::new());
        };
        let mut names = Vec::new();
        for entry in dir.entries().map_err(SpecificationError::persistence)? {
            let file = entry
                .and_then(|dir_entry| dir_entry.file_name())
                .map_err(SpecificationError::persistence)?;
            let Some(stem) = file.strip_suffix(SPEC_EXTENSION) else {
                continue;
            };
            if let Ok(name) = SpecName::new(stem) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn load(&self, name: &SpecName) -> SpecificationResult<TaskSpecification> {
        let Some(dir) = self.open_root().map_err(SpecificationError::persistence)? else {
            return Err(SpecificationError::NotFound(name.clone()));
        };
        let contents = match dir.read_to_string(file_name(name)) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SpecificationError::NotFound(name.clone()));
            }
            Err(err) => return Err(SpecificationError::persistence(err)),
        };
        serde_yaml::from_str(&contents).map_err(|err| SpecificationError::Malformed {
            name: name.clone(),
            source: Arc::new(err),
        })
    }
}
