//! Recipebook
//!
//! REST API server for the recipe catalog.

use tracing_subscriber::EnvFilter;

mod api;
mod build_info;
mod config;
mod db;
mod external;
mod models;
mod nutrition;

use api::AppState;
use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("recipebook=info".parse()?),
        )
        .init();

    build_info::print_startup_banner();

    let config = Config::from_env();
    eprintln!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::open(&config.database_path)?;
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let port = config.port;
    let state = AppState::new(database, config);
    let router = api::build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Listening on port {}", port);
    axum::serve(listener, router).await?;

    Ok(())
}
