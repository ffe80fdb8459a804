use axum::Router;
use std::sync::Arc;
use taskboard_common::web::{health_check_handler, serve, with_http_layers};

use crate::config::Config;
use crate::user::InMemoryUserStore;
use crate::user::api::{UserState, create_user_router};

/// Builds the users application with its health check and HTTP layers.
pub fn create_app(state: UserState) -> Router {
    let app = Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(create_user_router(state));
    with_http_layers(app)
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let state = UserState::new(Arc::new(InMemoryUserStore::seeded()));
    tracing::info!("Users store seeded");
    serve(create_app(state), config.port).await
}
