//! Catalog REST server.
//!
//! Run from repo root: `cargo run -p catalog-server`
//! Configuration comes from the environment (a `.env` file is read if present).

use movie_catalog::{catalog_routes, ensure_catalog_tables, ensure_database_exists, AppState, CatalogConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CatalogConfig::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "movie_catalog={level},catalog_server={level}",
                    level = config.log_level
                ))
            }),
        )
        .init();

    let connect_options = config.database.connect_options()?;
    ensure_database_exists(&connect_options).await?;
    let pool = config.database.connect().await?;
    ensure_catalog_tables(&pool).await?;

    let state = AppState::new(pool, &config);
    let app = catalog_routes(state);
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("catalog server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
