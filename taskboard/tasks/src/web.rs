use axum::Router;
use std::sync::Arc;
use taskboard_common::web::{health_check_handler, serve, with_http_layers};

use crate::clock::SystemClock;
use crate::config::Config;
use crate::directory::HttpUserDirectory;
use crate::task::InMemoryTaskStore;
use crate::task::api::{TaskState, create_task_router};

/// Builds the tasks application with its health check and HTTP layers.
pub fn create_app(state: TaskState) -> Router {
    let app = Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(create_task_router(state));
    with_http_layers(app)
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let directory = HttpUserDirectory::new(&config.users_api_url, config.users_api_timeout())?;
    tracing::info!(
        "Validating users against {} (timeout {:?})",
        directory.base_url(),
        config.users_api_timeout()
    );

    let state = TaskState::new(
        Arc::new(InMemoryTaskStore::seeded()),
        Arc::new(directory),
        Arc::new(SystemClock),
    );
    serve(create_app(state), config.port).await
}
