/// Common test utilities for integration tests
///
/// Builds a full router backed by an isolated in-memory database, so each
/// test exercises the real HTTP surface without external services.

use axum::body::Body;
use axum::http::{Request, Response};
use sqlx::SqlitePool;
use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::Config;
use taskdeck_shared::db::migrations::run_migrations;
use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
use tower::Service as _;

/// Test context containing the app and its database handle
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context with a fresh in-memory database
    pub async fn new() -> anyhow::Result<Self> {
        let db = create_pool(DatabaseConfig::in_memory()).await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), Config::default());
        let app = build_router(state);

        Ok(TestContext { db, app })
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> Response<axum::body::Body> {
        self.app
            .clone()
            .call(request)
            .await
            .expect("Router call failed")
    }

    /// Sends a JSON request and returns (status, parsed body)
    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (axum::http::StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("Failed to build request"),
            None => {
                builder = builder.header("content-type", "application/json");
                builder.body(Body::empty()).expect("Failed to build request")
            }
        };

        let response = self.send(request).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response was not JSON")
        };
        (status, json)
    }
}

/// Registers a user and returns its id
pub async fn register_user(ctx: &TestContext, name: &str, email: &str) -> i64 {
    let (status, body) = ctx
        .send_json(
            "POST",
            "/v1/auth/register",
            Some(serde_json::json!({
                "name": name,
                "email": email,
                "password": "secret1",
            })),
        )
        .await;
    assert_eq!(status, axum::http::StatusCode::CREATED, "register failed: {body}");
    body["user"]["id"].as_i64().expect("user id missing")
}

/// Creates a project owned by `owner_id` and returns its id
pub async fn create_project(ctx: &TestContext, name: &str, owner_id: i64) -> i64 {
    let (status, body) = ctx
        .send_json(
            "POST",
            "/v1/projects",
            Some(serde_json::json!({
                "name": name,
                "ownerId": owner_id,
            })),
        )
        .await;
    assert_eq!(status, axum::http::StatusCode::CREATED, "create project failed: {body}");
    body["id"].as_i64().expect("project id missing")
}

/// Creates a task and returns its id
pub async fn create_task(ctx: &TestContext, name: &str, project_id: Option<i64>) -> i64 {
    let mut payload = serde_json::json!({ "name": name });
    if let Some(project_id) = project_id {
        payload["projectId"] = serde_json::json!(project_id);
    }
    let (status, body) = ctx.send_json("POST", "/v1/tasks", Some(payload)).await;
    assert_eq!(status, axum::http::StatusCode::CREATED, "create task failed: {body}");
    body["id"].as_i64().expect("task id missing")
}
