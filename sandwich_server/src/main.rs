//! Sandwich shop API server.
//!
//! Run from repo root: `cargo run -p sandwich-server`
//! Configure with `DATABASE_URL`, `BIND_ADDR`, `DB_MAX_CONNECTIONS`, `DB_SCHEMA`, `RUST_LOG`
//! (a `.env` file in the working directory is honored).

use sandwich_api::{
    app_router, apply_migrations, connect, ensure_database_exists, AppConfig, AppState, Catalog,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("sandwich_api=info,tower_http=info")
            }),
        )
        .init();

    let config = AppConfig::from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = connect(&config).await?;

    let catalog = Catalog::standard()?;
    apply_migrations(&pool, &catalog, &config.schema).await?;
    let state = AppState::new(pool, catalog, &config.schema);

    let app = app_router(state);
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
