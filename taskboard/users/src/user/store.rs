use async_trait::async_trait;
use taskboard_common::store::{MemoryStore, StoreError};

use super::{User, seed_users};

/// Storage operations for user records.
///
/// Handlers only talk to this trait, so a persistent backend can replace the
/// in-memory one without touching them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn get(&self, id: u32) -> Result<Option<User>, StoreError>;
    /// Stores a new user under the next free ID.
    async fn create(&self, name: String) -> Result<User, StoreError>;
    /// Replaces the name of an existing user. Returns `None` for an unknown ID.
    async fn update(&self, id: u32, name: String) -> Result<Option<User>, StoreError>;
    /// Removes a user. Returns `false` for an unknown ID.
    async fn delete(&self, id: u32) -> Result<bool, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: MemoryStore<User>,
}

impl InMemoryUserStore {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: MemoryStore::with_records(users),
        }
    }

    /// A store holding the startup seed users.
    pub fn seeded() -> Self {
        Self::new(seed_users())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.all().await)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: u32) -> Result<Option<User>, StoreError> {
        Ok(self.users.find(id).await)
    }

    #[tracing::instrument(skip(self))]
    async fn create(&self, name: String) -> Result<User, StoreError> {
        Ok(self.users.insert_with(|id| User::new(id, name)).await)
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, id: u32, name: String) -> Result<Option<User>, StoreError> {
        Ok(self.users.modify(id, |user| user.rename(name)).await)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: u32) -> Result<bool, StoreError> {
        Ok(self.users.remove(id).await)
    }
}
