//! Sandwich shop REST API: CRUD over sandwiches, orders, resources, recipes and order details.

pub mod config;
pub mod error;
pub mod extractors;
pub mod migration;
pub mod model;
pub mod sql;
pub mod state;
pub mod store;
pub mod service;
pub mod handlers;
pub mod routes;

pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use model::{Catalog, EntityDef};
pub use state::AppState;
pub use store::{connect, ensure_database_exists};
pub use routes::{app_router, common_routes_with_ready, entity_routes};
pub use service::CrudService;
