use crate::clock::Clock;
use crate::directory::{UserDirectory, UserLookupError};
use taskboard_common::store::{Record, StoreError};

pub mod api;
pub mod store;

pub use store::{InMemoryTaskStore, TaskStore};

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Task {
    id: u32,
    user_id: u32,
    description: String,
    date: String,
    completed: bool,
}

impl Task {
    pub fn new(id: u32, user_id: u32, description: String, date: String, completed: bool) -> Self {
        Self {
            id,
            user_id,
            description,
            date,
            completed,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the ID of the user the task was created for.
    pub fn user_id(&self) -> u32 {
        self.user_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the task date, normally `YYYY-MM-DD`.
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn apply(&mut self, changes: TaskChanges) {
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
    }
}

impl Record for Task {
    fn id(&self) -> u32 {
        self.id
    }
}

/// The tasks every fresh process starts with.
pub fn seed_tasks() -> Vec<Task> {
    [
        (1, "Study React", "2025-09-07"),
        (2, "Review Java API", "2025-09-08"),
        (3, "Organize GitHub repository", "2025-09-09"),
        (4, "Test microservices in Postman", "2025-09-10"),
    ]
    .into_iter()
    .map(|(id, description, date)| {
        Task::new(id, id, description.to_string(), date.to_string(), false)
    })
    .collect()
}

/// The user a create request points at, as far as the request can tell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserRef {
    /// No user was given, or the given value is falsy.
    #[default]
    Missing,
    Id(u32),
    /// A value was given that no user ID can match.
    Unresolvable,
}

/// Raw input for creating a task, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub user: UserRef,
    pub description: Option<String>,
    pub date: Option<String>,
}

/// Fields to change on an existing task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub date: Option<String>,
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// The user ID or the description was missing or blank.
    #[error("userId and description are required")]
    MissingFields,
    /// The user ID could not be confirmed by the users service.
    #[error("Invalid user {user_id}: {cause}")]
    InvalidUser {
        user_id: u32,
        cause: UserLookupError,
    },
    /// The request named a user with a value that is not a user ID.
    #[error("Invalid user reference")]
    UnresolvableUser,
    /// Represents a task not found error.
    #[error("Task with ID {0} not found")]
    TaskNotFound(u32),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub struct TaskService<'a> {
    store: &'a dyn TaskStore,
    directory: &'a dyn UserDirectory,
    clock: &'a dyn Clock,
}

impl<'a> TaskService<'a> {
    pub fn new(
        store: &'a dyn TaskStore,
        directory: &'a dyn UserDirectory,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            store,
            directory,
            clock,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.store.list().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: u32) -> Result<Task, TaskServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    /// Retrieves the tasks created for `user_id`, whether or not that user still exists.
    #[tracing::instrument(skip(self))]
    pub async fn get_tasks_by_user(&self, user_id: u32) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.store.list_by_user(user_id).await?)
    }

    /// Creates a task after confirming its user with the users service.
    ///
    /// # Arguments
    ///
    /// * `new_task` - The raw request. The description is trimmed; a missing or
    ///   blank date becomes today's date, any other date is kept verbatim.
    ///
    /// # Returns
    ///
    /// The created `Task`, `MissingFields` when the user or description is
    /// absent, or `InvalidUser`/`UnresolvableUser` when the user cannot be
    /// confirmed for any reason.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, TaskServiceError> {
        if matches!(new_task.user, UserRef::Missing | UserRef::Id(0)) {
            return Err(TaskServiceError::MissingFields);
        }
        let description = new_task
            .description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty())
            .ok_or(TaskServiceError::MissingFields)?
            .to_string();

        let UserRef::Id(user_id) = new_task.user else {
            tracing::info!("Rejected task for a user reference that is not an ID");
            return Err(TaskServiceError::UnresolvableUser);
        };
        if let Err(cause) = self.directory.verify_user(user_id).await {
            log_lookup_failure(user_id, &cause);
            return Err(TaskServiceError::InvalidUser { user_id, cause });
        }

        let date = match new_task.date {
            Some(date) if !date.trim().is_empty() => date,
            _ => self.clock.today(),
        };

        let task = self.store.create(user_id, description, date).await?;
        tracing::info!("Created task {} for user {}", task.id(), user_id);
        Ok(task)
    }

    /// Applies a partial update to a task.
    ///
    /// The description is trimmed and may become empty. A blank date is ignored.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(
        &self,
        id: u32,
        changes: TaskChanges,
    ) -> Result<Task, TaskServiceError> {
        let changes = TaskChanges {
            description: changes
                .description
                .map(|description| description.trim().to_string()),
            completed: changes.completed,
            date: changes.date.filter(|date| !date.trim().is_empty()),
        };
        self.store
            .update(id, changes)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: u32) -> Result<(), TaskServiceError> {
        if self.store.delete(id).await? {
            tracing::info!("Deleted task {}", id);
            Ok(())
        } else {
            Err(TaskServiceError::TaskNotFound(id))
        }
    }
}

fn log_lookup_failure(user_id: u32, cause: &UserLookupError) {
    match cause {
        UserLookupError::NotFound(_) => {
            tracing::info!("Rejected task for unknown user {}", user_id)
        }
        UserLookupError::UnexpectedStatus(status) => tracing::warn!(
            "Users service answered {} while checking user {}",
            status,
            user_id
        ),
        UserLookupError::Timeout(timeout) => tracing::warn!(
            "Users service timed out after {:?} while checking user {}",
            timeout,
            user_id
        ),
        UserLookupError::Transport(reason) => tracing::warn!(
            "Users service unreachable while checking user {}: {}",
            user_id,
            reason
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::directory::MockUserDirectory;
    use crate::task::store::MockTaskStore;
    use mockall::predicate::eq;
    use std::time::Duration;

    const TODAY: &str = "2026-10-14";

    fn accepting_directory() -> MockUserDirectory {
        let mut directory = MockUserDirectory::new();
        directory.expect_verify_user().returning(|_| Ok(()));
        directory
    }

    fn new_task(user_id: Option<u32>, description: Option<&str>, date: Option<&str>) -> NewTask {
        NewTask {
            user: user_id.map_or(UserRef::Missing, UserRef::Id),
            description: description.map(str::to_string),
            date: date.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn can_create_task_with_defaulted_date() {
        let store = InMemoryTaskStore::seeded();
        let directory = accepting_directory();
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);

        let task = service
            .create_task(new_task(Some(1), Some("  Write tests "), None))
            .await
            .unwrap();

        assert_eq!(
            task,
            Task::new(5, 1, "Write tests".to_string(), TODAY.to_string(), false)
        );
        assert_eq!(service.get_all_tasks().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn can_default_blank_date_to_today() {
        let store = InMemoryTaskStore::seeded();
        let directory = accepting_directory();
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);

        let task = service
            .create_task(new_task(Some(2), Some("Plan"), Some("   ")))
            .await
            .unwrap();

        assert_eq!(task.date(), TODAY);
    }

    #[tokio::test]
    async fn can_keep_explicit_date_verbatim() {
        let store = InMemoryTaskStore::seeded();
        let directory = accepting_directory();
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);

        let task = service
            .create_task(new_task(Some(2), Some("Plan"), Some("next friday ")))
            .await
            .unwrap();

        assert_eq!(task.date(), "next friday ");
    }

    #[tokio::test]
    async fn cannot_create_task_without_user_or_description() {
        let store = InMemoryTaskStore::seeded();
        let mut directory = MockUserDirectory::new();
        directory.expect_verify_user().never();
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);

        let invalid = [
            new_task(None, Some("x"), None),
            new_task(Some(0), Some("x"), None),
            new_task(Some(1), None, None),
            new_task(Some(1), Some(" \n "), None),
        ];
        for request in invalid {
            let result = service.create_task(request).await;
            assert!(matches!(result, Err(TaskServiceError::MissingFields)));
        }
        assert_eq!(service.get_all_tasks().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn cannot_create_task_for_unresolvable_user_without_lookup() {
        let store = InMemoryTaskStore::seeded();
        let mut directory = MockUserDirectory::new();
        directory.expect_verify_user().never();
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);

        let request = NewTask {
            user: UserRef::Unresolvable,
            description: Some("x".to_string()),
            date: None,
        };
        let result = service.create_task(request).await;

        assert!(matches!(result, Err(TaskServiceError::UnresolvableUser)));
        assert_eq!(service.get_all_tasks().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn can_require_description_before_checking_unresolvable_user() {
        let store = InMemoryTaskStore::seeded();
        let directory = MockUserDirectory::new();
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);

        let request = NewTask {
            user: UserRef::Unresolvable,
            description: None,
            date: None,
        };
        let result = service.create_task(request).await;

        assert!(matches!(result, Err(TaskServiceError::MissingFields)));
    }

    #[tokio::test]
    async fn cannot_create_task_for_unknown_user() {
        let store = InMemoryTaskStore::seeded();
        let mut directory = MockUserDirectory::new();
        directory
            .expect_verify_user()
            .with(eq(999))
            .times(1)
            .returning(|id| Err(UserLookupError::NotFound(id)));
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);

        let result = service
            .create_task(new_task(Some(999), Some("x"), Some("2026-01-01")))
            .await;

        assert!(matches!(
            result,
            Err(TaskServiceError::InvalidUser {
                user_id: 999,
                cause: UserLookupError::NotFound(999)
            })
        ));
        assert_eq!(service.get_all_tasks().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn cannot_create_task_when_users_service_is_unavailable() {
        let failures = [
            UserLookupError::Timeout(Duration::from_millis(50)),
            UserLookupError::Transport("connection refused".to_string()),
            UserLookupError::UnexpectedStatus(503),
        ];

        for failure in failures {
            let store = InMemoryTaskStore::seeded();
            let mut directory = MockUserDirectory::new();
            let returned = failure.clone();
            directory
                .expect_verify_user()
                .returning(move |_| Err(returned.clone()));
            let clock = FixedClock::new(TODAY);
            let service = TaskService::new(&store, &directory, &clock);

            let result = service.create_task(new_task(Some(1), Some("x"), None)).await;

            match result {
                Err(TaskServiceError::InvalidUser { user_id, cause }) => {
                    assert_eq!(user_id, 1);
                    assert_eq!(cause, failure);
                }
                other => panic!("expected InvalidUser, got {:?}", other),
            }
            assert_eq!(service.get_all_tasks().await.unwrap().len(), 4);
        }
    }

    #[tokio::test]
    async fn can_list_tasks_of_a_user() {
        let store = InMemoryTaskStore::seeded();
        let directory = accepting_directory();
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);
        service
            .create_task(new_task(Some(3), Some("Second for Carlos"), None))
            .await
            .unwrap();

        let ids: Vec<u32> = service
            .get_tasks_by_user(3)
            .await
            .unwrap()
            .iter()
            .map(Task::id)
            .collect();

        assert_eq!(ids, vec![3, 5]);
        assert!(service.get_tasks_by_user(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn can_update_description_and_completion() {
        let store = InMemoryTaskStore::seeded();
        let directory = MockUserDirectory::new();
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);

        let updated = service
            .update_task(
                1,
                TaskChanges {
                    description: Some("  Study Rust ".to_string()),
                    completed: Some(true),
                    date: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(
            updated,
            Task::new(1, 1, "Study Rust".to_string(), "2025-09-07".to_string(), true)
        );
    }

    #[tokio::test]
    async fn can_store_empty_description_on_update() {
        let store = InMemoryTaskStore::seeded();
        let directory = MockUserDirectory::new();
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);

        let updated = service
            .update_task(
                2,
                TaskChanges {
                    description: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.description(), "");
    }

    #[tokio::test]
    async fn can_ignore_blank_date_on_update() {
        let store = InMemoryTaskStore::seeded();
        let directory = MockUserDirectory::new();
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);

        let updated = service
            .update_task(
                3,
                TaskChanges {
                    date: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.date(), "2025-09-09");
    }

    #[tokio::test]
    async fn cannot_update_or_delete_missing_task() {
        let store = InMemoryTaskStore::seeded();
        let directory = MockUserDirectory::new();
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);

        let updated = service.update_task(50, TaskChanges::default()).await;
        let deleted = service.delete_task_by_id(50).await;

        assert!(matches!(updated, Err(TaskServiceError::TaskNotFound(50))));
        assert!(matches!(deleted, Err(TaskServiceError::TaskNotFound(50))));
        assert_eq!(service.get_all_tasks().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn can_surface_store_failures_after_validation() {
        let mut store = MockTaskStore::new();
        store
            .expect_create()
            .returning(|_, _, _| Err(StoreError::Backend("unavailable".to_string())));
        let directory = accepting_directory();
        let clock = FixedClock::new(TODAY);
        let service = TaskService::new(&store, &directory, &clock);

        let result = service.create_task(new_task(Some(1), Some("x"), None)).await;

        assert!(matches!(result, Err(TaskServiceError::Store(_))));
    }
}
