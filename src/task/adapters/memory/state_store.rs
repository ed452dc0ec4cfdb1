//! In-memory task state store for orchestration tests.

use async_trait::async_trait;
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{TaskId, TaskRecord},
    ports::{TaskStateError, TaskStateResult, TaskStateStore},
};

/// Thread-safe in-memory task state store.
#[derive(Debug, Clone)]
pub struct InMemoryTaskStateStore<C>
where
    C: Clock + Send + Sync,
{
    records: Arc<RwLock<BTreeMap<TaskId, TaskRecord>>>,
    clock: Arc<C>,
}

impl<C> InMemoryTaskStateStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store stamping records with `clock`.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            clock,
        }
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskStateError {
    TaskStateError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl<C> TaskStateStore for InMemoryTaskStateStore<C>
where
    C: Clock + Send + Sync,
{
    async fn save(&self, record: &mut TaskRecord) -> TaskStateResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        record.stamp(self.clock.utc());
        records.insert(record.task_id().clone(), record.clone());
        Ok(())
    }

    async fn load(&self, task_id: &TaskId) -> TaskStateResult<Option<TaskRecord>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.get(task_id).cloned())
    }

    async fn exists(&self, task_id: &TaskId) -> TaskStateResult<bool> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.contains_key(task_id))
    }

    async fn delete(&self, task_id: &TaskId) -> TaskStateResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        records.remove(task_id);
        Ok(())
    }

    async fn list_tasks(&self) -> TaskStateResult<Vec<TaskId>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.keys().cloned().collect())
    }
}
