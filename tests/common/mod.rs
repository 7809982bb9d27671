//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use sandwich_api::{app_router, apply_migrations, AppState, Catalog};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;

/// Router whose pool never connects; only paths that fail before touching the
/// database may be exercised with it.
pub fn offline_app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://offline.invalid/sandwich_shop")
        .unwrap();
    app_router(AppState::new(pool, Catalog::standard().unwrap(), "public"))
}

/// A migrated, throwaway schema in the database named by `TEST_DATABASE_URL`.
pub struct TestDb {
    pub pool: PgPool,
    pub schema: String,
    pub app: Router,
}

impl TestDb {
    /// `None` when `TEST_DATABASE_URL` is unset so database tests can be skipped.
    pub async fn connect() -> Option<TestDb> {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set; skipping database test");
            return None;
        };
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .unwrap();
        let schema = format!("test_{}", uuid::Uuid::new_v4().simple());
        let catalog = Catalog::standard().unwrap();
        apply_migrations(&pool, &catalog, &schema).await.unwrap();
        let app = app_router(AppState::new(pool.clone(), catalog, &schema));
        Some(TestDb { pool, schema, app })
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        call(&self.app, method, uri, body).await
    }

    pub async fn drop_schema(self) {
        sqlx::query(&format!("DROP SCHEMA \"{}\" CASCADE", self.schema))
            .execute(&self.pool)
            .await
            .unwrap();
    }
}

/// Send one request and decode the JSON response (Null for an empty body).
pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}
