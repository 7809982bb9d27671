//! Shared application state for all routes.

use crate::model::Catalog;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub catalog: Arc<Catalog>,
    /// Schema holding the entity tables.
    pub schema: Arc<str>,
}

impl AppState {
    pub fn new(pool: PgPool, catalog: Catalog, schema: &str) -> Self {
        AppState {
            pool,
            catalog: Arc::new(catalog),
            schema: Arc::from(schema),
        }
    }
}
