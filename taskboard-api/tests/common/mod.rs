/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup (isolated in-memory SQLite per context)
/// - Router construction
/// - Request helpers for driving the app in-process

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::SqlitePool;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, Config, DatabaseConfig};
use taskboard_shared::db::migrations::run_migrations;
use taskboard_shared::db::pool::{create_pool, DatabaseConfig as PoolConfig};
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context with a fresh, migrated in-memory database
    ///
    /// A single pooled connection keeps every transaction scope on the same
    /// in-memory database.
    pub async fn new() -> anyhow::Result<Self> {
        let db = create_pool(PoolConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        })
        .await?;

        run_migrations(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext { db, app })
    }

    /// Sends a request with an optional JSON body, returning status and
    /// parsed response body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let request = builder.body(body).unwrap();
        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }
}

/// Returns an email address no other test run has used
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}

/// Helper to create a user via the API, returning its id
pub async fn create_test_user(ctx: &TestContext, name: &str, email: &str) -> i64 {
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/users",
            Some(serde_json::json!({ "name": name, "email": email })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "create user failed: {}", body);
    body["id"].as_i64().unwrap()
}

/// Helper to create a task via the API, returning its id
pub async fn create_test_task(ctx: &TestContext, title: &str, text: Option<&str>, user_id: i64) -> i64 {
    let (status, body) = ctx
        .request(
            "POST",
            "/v1/tasks",
            Some(serde_json::json!({ "title": title, "text": text, "user_id": user_id })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);
    body["id"].as_i64().unwrap()
}
