//! JSON file task state store with atomic replacement.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::Clock;
use std::io::{self, Write};
use std::sync::Arc;

use crate::task::{
    domain::{TaskId, TaskRecord},
    ports::{TaskStateError, TaskStateResult, TaskStateStore},
};

const RECORD_EXTENSION: &str = ".json";
const TEMPORARY_EXTENSION: &str = ".json.tmp";

/// Task state store keeping one `<task_id>.json` file per task.
///
/// Each save serializes into `<task_id>.json.tmp` in the same directory,
/// syncs it, and renames it over the live file. A crash mid-write leaves at
/// most an orphaned temporary file, which [`TaskStateStore::list_tasks`]
/// ignores. The directory is created on first save.
#[derive(Debug, Clone)]
pub struct FileTaskStateStore<C>
where
    C: Clock + Send + Sync,
{
    root: Utf8PathBuf,
    clock: Arc<C>,
}

impl<C> FileTaskStateStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>, clock: Arc<C>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    /// Returns the directory holding task records.
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

    fn open_or_create_root(&self) -> io::Result<Dir> {
        std::fs::create_dir_all(&self.root)?;
        Dir::open_ambient_dir(&self.root, ambient_authority())
    }
}

fn record_name(task_id: &TaskId) -> String {
    format!("{task_id}{RECORD_EXTENSION}")
}

fn temporary_name(task_id: &TaskId) -> String {
    format!("{task_id}{TEMPORARY_EXTENSION}")
}

fn write_atomically(dir: &Dir, task_id: &TaskId, contents: &[u8]) -> io::Result<()> {
    let temporary = temporary_name(task_id);
    let mut file = dir.create(&temporary)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    dir.rename(&temporary, dir, record_name(task_id))
}

#[async_trait]
impl<C> TaskStateStore for FileTaskStateStore<C>
where
    C: Clock + Send + Sync,
{
    async fn save(&self, record: &mut TaskRecord) -> TaskStateResult<()> {
        record.stamp(self.clock.utc());
        let contents = serde_json::to_vec_pretty(record).map_err(TaskStateError::persistence)?;
        let dir = self
            .open_or_create_root()
            .map_err(TaskStateError::persistence)?;
        write_atomically(&dir, record.task_id(), &contents).map_err(TaskStateError::persistence)
    }

    async fn load(&self, task_id: &TaskId) -> TaskStateResult<Option<TaskRecord>> {
        let Some(dir) = self.open_root().map_err(TaskStateError::persistence)? else {
            return Ok(None);
        };
        let contents = match dir.read_to_string(record_name(task_id)) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(TaskStateError::persistence(err)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|err| TaskStateError::malformed(task_id.clone(), err))
    }

    async fn exists(&self, task_id: &TaskId) -> TaskStateResult<bool> {
        let Some(dir) = self.open_root().map_err(TaskStateError::persistence)? else {
            return Ok(false);
        };
        match dir.metadata(record_name(task_id)) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(TaskStateError::persistence(err)),
        }
    }

    async fn delete(&self, task_id: &TaskId) -> TaskStateResult<()> {
        let Some(dir) = self.open_root().map_err(TaskStateError::persistence)? else {
            return Ok(());
        };
        match dir.remove_file(record_name(task_id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(TaskStateError::persistence(err)),
        }
    }

    async fn list_tasks(&self) -> TaskStateResult<Vec<TaskId>> {
        let Some(dir) = self.open_root().map_err(TaskStateError::persistence)? else {
            return Ok(Vec::new());
        };
        let mut task_ids = Vec::new();
        for entry in dir.entries().map_err(TaskStateError::persistence)? {
            let name = entry
                .and_then(|dir_entry| dir_entry.file_name())
                .map_err(TaskStateError::persistence)?;
            let Some(stem) = name.strip_suffix(RECORD_EXTENSION) else {
                continue;
            };
            if let Ok(task_id) = TaskId::new(stem) {
                task_ids.push(task_id);
            }
        }
        task_ids.sort();
        Ok(task_ids)
    }
}
