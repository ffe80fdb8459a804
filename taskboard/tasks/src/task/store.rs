use async_trait::async_trait;
use taskboard_common::store::{MemoryStore, StoreError};

use super::{Task, TaskChanges, seed_tasks};

/// Storage operations for task records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, StoreError>;
    async fn get(&self, id: u32) -> Result<Option<Task>, StoreError>;
    async fn list_by_user(&self, user_id: u32) -> Result<Vec<Task>, StoreError>;
    /// Stores a new, not yet completed task under the next free ID.
    async fn create(
        &self,
        user_id: u32,
        description: String,
        date: String,
    ) -> Result<Task, StoreError>;
    /// Applies `changes` to an existing task. Returns `None` for an unknown ID.
    async fn update(&self, id: u32, changes: TaskChanges) -> Result<Option<Task>, StoreError>;
    /// Removes a task. Returns `false` for an unknown ID.
    async fn delete(&self, id: u32) -> Result<bool, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: MemoryStore<Task>,
}

impl InMemoryTaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: MemoryStore::with_records(tasks),
        }
    }

    /// A store holding the startup seed tasks.
    pub fn seeded() -> Self {
        Self::new(seed_tasks())
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.all().await)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: u32) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.find(id).await)
    }

    #[tracing::instrument(skip(self))]
    async fn list_by_user(&self, user_id: u32) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.filter(|task| task.user_id() == user_id).await)
    }

    #[tracing::instrument(skip(self))]
    async fn create(
        &self,
        user_id: u32,
        description: String,
        date: String,
    ) -> Result<Task, StoreError> {
        Ok(self
            .tasks
            .insert_with(|id| Task::new(id, user_id, description, date, false))
            .await)
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, id: u32, changes: TaskChanges) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.modify(id, |task| task.apply(changes)).await)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: u32) -> Result<bool, StoreError> {
        Ok(self.tasks.remove(id).await)
    }
}
