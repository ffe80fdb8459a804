use crate::user::{User, UserService, UserServiceError, UserStore};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskboard_common::web::error_response;

#[derive(Clone)]
pub struct UserState {
    pub store: Arc<dyn UserStore>,
}

impl UserState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

/// JSON representation of a User.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserJson {
    pub id: u32,
    pub name: String,
}

impl From<User> for UserJson {
    fn from(user: User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_string(),
        }
    }
}

/// Body accepted by `POST /users` and `PUT /users/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UserNameRequest {
    #[serde(default)]
    name: Option<String>,
}

/// Errors returned by the users JSON endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] UserServiceError),
    /// The path did not carry a numeric user ID.
    #[error("Malformed user ID in path")]
    MalformedId,
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Service(UserServiceError::NameRequired) => {
                error_response(StatusCode::BAD_REQUEST, "Name is required")
            }
            ApiError::Service(UserServiceError::UserNotFound(_)) | ApiError::MalformedId => {
                error_response(StatusCode::NOT_FOUND, "User not found")
            }
            ApiError::InvalidBody(rejection) => {
                tracing::debug!("Rejected request body: {}", rejection);
                error_response(StatusCode::BAD_REQUEST, "Invalid JSON body")
            }
            ApiError::Service(err @ UserServiceError::Store(_)) => {
                tracing::error!("Users request failed: {}", err);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        }
    }
}

fn user_id(path: Result<Path<u32>, PathRejection>) -> Result<u32, ApiError> {
    path.map(|Path(id)| id).map_err(|_| ApiError::MalformedId)
}

/// Handler for GET /users.
#[tracing::instrument(skip(state))]
pub async fn list_users_handler(
    State(state): State<UserState>,
) -> Result<Json<Vec<UserJson>>, ApiError> {
    let service = UserService::new(state.store.as_ref());
    let users = service.get_all_users().await?;
    Ok(Json(users.into_iter().map(UserJson::from).collect()))
}

/// Handler for GET /users/{id}.
#[tracing::instrument(skip(state))]
pub async fn get_user_handler(
    State(state): State<UserState>,
    path: Result<Path<u32>, PathRejection>,
) -> Result<Json<UserJson>, ApiError> {
    let id = user_id(path)?;
    let service = UserService::new(state.store.as_ref());
    let user = service.get_user_by_id(id).await?;
    Ok(Json(user.into()))
}

/// Handler for POST /users.
#[tracing::instrument(skip(state))]
pub async fn create_user_handler(
    State(state): State<UserState>,
    payload: Result<Json<UserNameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserJson>), ApiError> {
    let Json(payload) = payload?;
    let service = UserService::new(state.store.as_ref());
    let user = service.create_user(payload.name.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Handler for PUT /users/{id}.
#[tracing::instrument(skip(state))]
pub async fn update_user_handler(
    State(state): State<UserState>,
    path: Result<Path<u32>, PathRejection>,
    payload: Result<Json<UserNameRequest>, JsonRejection>,
) -> Result<Json<UserJson>, ApiError> {
    let id = user_id(path)?;
    let service = UserService::new(state.store.as_ref());
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            // An unknown ID wins over a malformed body.
            service.get_user_by_id(id).await?;
            return Err(rejection.into());
        }
    };
    let user = service.rename_user(id, payload.name.as_deref()).await?;
    Ok(Json(user.into()))
}

/// Handler for DELETE /users/{id}.
#[tracing::instrument(skip(state))]
pub async fn delete_user_handler(
    State(state): State<UserState>,
    path: Result<Path<u32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = user_id(path)?;
    let service = UserService::new(state.store.as_ref());
    service.delete_user_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and returns the users router.
pub fn create_user_router(state: UserState) -> Router {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/{id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .with_state(state)
}
