use taskboard_common::store::{Record, StoreError};

pub mod api;
pub mod store;

pub use store::{InMemoryUserStore, UserStore};

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct User {
    id: u32,
    name: String,
}

impl User {
    pub fn new(id: u32, name: String) -> Self {
        Self { id, name }
    }

    /// Returns the ID of the user.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the name of the user.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }
}

impl Record for User {
    fn id(&self) -> u32 {
        self.id
    }
}

/// The users every fresh process starts with.
pub fn seed_users() -> Vec<User> {
    ["Alice", "Bob", "Carlos", "Diana"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| User::new(id, name.to_string()))
        .collect()
}

/// Error type for UserService operations.
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// The name was missing or blank after trimming.
    #[error("Name is required")]
    NameRequired,
    /// Represents a user not found error.
    #[error("User with ID {0} not found")]
    UserNotFound(u32),
    /// The underlying store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub struct UserService<'a> {
    store: &'a dyn UserStore,
}

impl<'a> UserService<'a> {
    pub fn new(store: &'a dyn UserStore) -> Self {
        Self { store }
    }

    /// Retrieves all users in insertion order.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_users(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self.store.list().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_user_by_id(&self, id: u32) -> Result<User, UserServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or(UserServiceError::UserNotFound(id))
    }

    /// Creates a user from a raw, possibly missing name.
    ///
    /// # Arguments
    ///
    /// * `name` - The requested name; it is trimmed before being stored.
    ///
    /// # Returns
    ///
    /// The created `User`, or `NameRequired` when the name is missing or blank.
    #[tracing::instrument(skip(self))]
    pub async fn create_user(&self, name: Option<&str>) -> Result<User, UserServiceError> {
        let name = required_name(name)?;
        let user = self.store.create(name).await?;
        tracing::info!("Created user {}", user.id());
        Ok(user)
    }

    /// Renames the user with the given ID.
    ///
    /// An unknown ID is reported before the name is validated.
    #[tracing::instrument(skip(self))]
    pub async fn rename_user(
        &self,
        id: u32,
        name: Option<&str>,
    ) -> Result<User, UserServiceError> {
        let name = match required_name(name) {
            Ok(name) => name,
            Err(err) => {
                self.get_user_by_id(id).await?;
                return Err(err);
            }
        };
        self.store
            .update(id, name)
            .await?
            .ok_or(UserServiceError::UserNotFound(id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_user_by_id(&self, id: u32) -> Result<(), UserServiceError> {
        if self.store.delete(id).await? {
            tracing::info!("Deleted user {}", id);
            Ok(())
        } else {
            Err(UserServiceError::UserNotFound(id))
        }
    }
}

fn required_name(name: Option<&str>) -> Result<String, UserServiceError> {
    match name.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(UserServiceError::NameRequired),
    }
}
