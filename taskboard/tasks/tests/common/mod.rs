#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use std::net::SocketAddr;
use std::sync::Arc;
use taskboard_tasks::clock::FixedClock;
use taskboard_tasks::directory::{UserDirectory, UserLookupError};
use taskboard_tasks::task::InMemoryTaskStore;
use taskboard_tasks::task::api::TaskState;
use taskboard_tasks::web::create_app;
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const TODAY: &str = "2026-10-14";

/// Response captured from a single request against an app.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }
}

/// Directory that knows a fixed set of user IDs.
pub struct StaticUserDirectory {
    known: Vec<u32>,
}

impl StaticUserDirectory {
    pub fn new(known: impl Into<Vec<u32>>) -> Self {
        Self {
            known: known.into(),
        }
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn verify_user(&self, user_id: u32) -> Result<(), UserLookupError> {
        if self.known.contains(&user_id) {
            Ok(())
        } else {
            Err(UserLookupError::NotFound(user_id))
        }
    }
}

/// Builds the tasks app over the seed tasks with a fixed clock.
pub fn tasks_app(directory: Arc<dyn UserDirectory>) -> Router {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let state = TaskState::new(
        Arc::new(InMemoryTaskStore::seeded()),
        directory,
        Arc::new(FixedClock::new(TODAY)),
    );
    create_app(state)
}

/// Tasks app whose directory knows the four seed users.
pub fn seeded_tasks_app() -> Router {
    tasks_app(Arc::new(StaticUserDirectory::new([1, 2, 3, 4])))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    TestResponse { status, body }
}

/// Serves `app` on an ephemeral loopback port and returns its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", address)
}

/// Runs a seeded users service on a loopback port and returns its base URL.
pub async fn spawn_users_service() -> String {
    let store = Arc::new(taskboard_users::user::InMemoryUserStore::seeded());
    let state = taskboard_users::user::api::UserState::new(store);
    spawn_server(taskboard_users::web::create_app(state)).await
}

/// Accepts connections and never answers them.
pub async fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("http://{}", address)
}

/// Returns a loopback address nothing is listening on.
pub async fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", address)
}
