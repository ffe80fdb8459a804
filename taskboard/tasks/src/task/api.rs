use crate::clock::Clock;
use crate::directory::UserDirectory;
use crate::task::{
    NewTask, Task, TaskChanges, TaskService, TaskServiceError, TaskStore, UserRef,
};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;
use taskboard_common::web::error_response;

#[derive(Clone)]
pub struct TaskState {
    pub store: Arc<dyn TaskStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub clock: Arc<dyn Clock>,
}

impl TaskState {
    pub fn new(
        store: Arc<dyn TaskStore>,
        directory: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            directory,
            clock,
        }
    }

    fn service(&self) -> TaskService<'_> {
        TaskService::new(
            self.store.as_ref(),
            self.directory.as_ref(),
            self.clock.as_ref(),
        )
    }
}

/// JSON representation of a Task.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    pub id: u32,
    pub user_id: u32,
    pub description: String,
    pub date: String,
    pub completed: bool,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            user_id: task.user_id(),
            description: task.description().to_string(),
            date: task.date().to_string(),
            completed: task.completed(),
        }
    }
}

/// Body accepted by `POST /tasks`.
///
/// `userId` accepts a JSON number or a numeric string. Any other truthy value
/// names no user.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    user_id: Option<Value>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(request: CreateTaskRequest) -> Self {
        NewTask {
            user: user_ref_from_json(request.user_id.as_ref()),
            description: request.description,
            date: request.date,
        }
    }
}

/// Body accepted by `PUT /tasks/{id}`. Absent fields are left untouched.
///
/// An explicit `null` counts as present: it clears `completed` and is rejected
/// as a `description`. A `null` date is ignored like a blank one.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "present")]
    description: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    completed: Option<Value>,
    #[serde(default)]
    date: Option<String>,
}

impl TryFrom<UpdateTaskRequest> for TaskChanges {
    type Error = ApiError;

    fn try_from(request: UpdateTaskRequest) -> Result<Self, Self::Error> {
        let description = request
            .description
            .map(|value| text_from_json(value).ok_or(ApiError::InvalidField("description")))
            .transpose()?;
        Ok(TaskChanges {
            description,
            completed: request.completed.as_ref().map(is_truthy),
            date: request.date,
        })
    }
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing field is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn user_ref_from_json(value: Option<&Value>) -> UserRef {
    match value {
        None => UserRef::Missing,
        Some(value) if !is_truthy(value) => UserRef::Missing,
        Some(value) => user_id_from_json(value).map_or(UserRef::Unresolvable, UserRef::Id),
    }
}

/// Reads a positive user ID from a JSON number or numeric string.
fn user_id_from_json(value: &Value) -> Option<u32> {
    let id = match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && *float > 0.0)
                .map(|float| float as u64)
        })?,
        Value::String(text) => text.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(id).ok().filter(|id| *id != 0)
}

/// Renders a scalar JSON value as text; arrays and objects have no text form.
fn text_from_json(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|float| float != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Errors returned by the tasks JSON endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] TaskServiceError),
    /// The path did not carry a numeric task ID.
    #[error("Malformed task ID in path")]
    MalformedId,
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error("Field {0} has an unsupported type")]
    InvalidField(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Service(TaskServiceError::MissingFields) => error_response(
                StatusCode::BAD_REQUEST,
                "userId and description are required",
            ),
            ApiError::Service(
                TaskServiceError::InvalidUser { .. } | TaskServiceError::UnresolvableUser,
            ) => {
                error_response(StatusCode::BAD_REQUEST, "Invalid user (not found)")
            }
            ApiError::Service(TaskServiceError::TaskNotFound(_)) | ApiError::MalformedId => {
                error_response(StatusCode::NOT_FOUND, "Task not found")
            }
            ApiError::InvalidBody(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection);
                error_response(StatusCode::BAD_REQUEST, "Invalid JSON body")
            }
            ApiError::InvalidField(field) => error_response(
                StatusCode::BAD_REQUEST,
                format!("{} has an unsupported type", field),
            ),
            ApiError::Service(err @ TaskServiceError::Store(_)) => {
                tracing::error!("Tasks request failed: {}", err);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        }
    }
}

fn path_id(path: Result<Path<u32>, PathRejection>) -> Result<u32, ApiError> {
    path.map(|Path(id)| id).map_err(|_| ApiError::MalformedId)
}

fn to_json(tasks: Vec<Task>) -> Json<Vec<TaskJson>> {
    Json(tasks.into_iter().map(TaskJson::from).collect())
}

/// Handler for GET /tasks.
#[tracing::instrument(skip(state))]
pub async fn list_tasks_handler(
    State(state): State<TaskState>,
) -> Result<Json<Vec<TaskJson>>, ApiError> {
    let tasks = state.service().get_all_tasks().await?;
    Ok(to_json(tasks))
}

/// Handler for GET /tasks/{id}.
#[tracing::instrument(skip(state))]
pub async fn get_task_handler(
    State(state): State<TaskState>,
    path: Result<Path<u32>, PathRejection>,
) -> Result<Json<TaskJson>, ApiError> {
    let id = path_id(path)?;
    let task = state.service().get_task_by_id(id).await?;
    Ok(Json(task.into()))
}

/// Handler for GET /tasks/user/{user_id}.
///
/// A user ID that is not a number matches no task.
#[tracing::instrument(skip(state))]
pub async fn list_user_tasks_handler(
    State(state): State<TaskState>,
    path: Result<Path<u32>, PathRejection>,
) -> Result<Json<Vec<TaskJson>>, ApiError> {
    let Ok(Path(user_id)) = path else {
        return Ok(Json(Vec::new()));
    };
    let tasks = state.service().get_tasks_by_user(user_id).await?;
    Ok(to_json(tasks))
}

/// Handler for POST /tasks.
#[tracing::instrument(skip(state))]
pub async fn create_task_handler(
    State(state): State<TaskState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskJson>), ApiError> {
    let Json(payload) = payload?;
    let task = state.service().create_task(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

/// Handler for PUT /tasks/{id}.
#[tracing::instrument(skip(state))]
pub async fn update_task_handler(
    State(state): State<TaskState>,
    path: Result<Path<u32>, PathRejection>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<TaskJson>, ApiError> {
    let id = path_id(path)?;
    let service = state.service();
    let changes = match payload
        .map_err(ApiError::from)
        .and_then(|Json(payload)| TaskChanges::try_from(payload))
    {
        Ok(changes) => changes,
        Err(err) => {
            // An unknown ID wins over a malformed body.
            service.get_task_by_id(id).await?;
            return Err(err);
        }
    };
    let task = service.update_task(id, changes).await?;
    Ok(Json(task.into()))
}

/// Handler for DELETE /tasks/{id}.
#[tracing::instrument(skip(state))]
pub async fn delete_task_handler(
    State(state): State<TaskState>,
    path: Result<Path<u32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(path)?;
    state.service().delete_task_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and returns the tasks router.
pub fn create_task_router(state: TaskState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route("/tasks/user/{user_id}", get(list_user_tasks_handler))
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(state)
}
