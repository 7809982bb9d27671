//! Service routes outside the entity collections.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct Liveness {
    status: &'static str,
}

#[derive(Serialize)]
struct Readiness {
    status: &'static str,
    database: &'static str,
}

/// What this deployment serves: package identity plus the mounted collections.
#[derive(Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
    service: &'static str,
    resources: Vec<&'static str>,
}

async fn health() -> Json<Liveness> {
    Json(Liveness { status: "ok" })
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(Readiness { status: "ok", database: "ok" }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "database not reachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness { status: "degraded", database: "unavailable" }),
            )
        }
    }
}

async fn version(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        service: "sandwich shop",
        resources: state
            .catalog
            .entities()
            .iter()
            .map(|e| e.path_segment)
            .collect(),
    })
}

/// GET /health (liveness), /ready (database round trip), /version (service info).
pub fn common_routes_with_ready(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
