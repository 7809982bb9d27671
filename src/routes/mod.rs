//! Route assembly and middleware.

mod common;
mod entity;

pub use common::common_routes_with_ready;
pub use entity::entity_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body.
pub const BODY_LIMIT: usize = 64 * 1024;

/// Any origin, method and header; the origin is mirrored so credentials stay allowed.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Full application: common routes, entity CRUD, CORS, body limit, request tracing.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(entity_routes(state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}
