//! Nutrition backfill job
//!
//! One-shot: fills in nutrition for every recipe still missing it,
//! pausing one second between recipes. Driven entirely by environment
//! variables (database path, Edamam credentials).
//!
//! Usage: cargo run --bin backfill_nutrition

use tracing_subscriber::EnvFilter;

use recipebook::config::Config;
use recipebook::db;
use recipebook::external::EdamamClient;
use recipebook::nutrition::{run_backfill, RECIPE_DELAY};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("recipebook=info".parse()?),
        )
        .init();

    let config = Config::from_env();
    eprintln!("Database path: {}", config.database_path.display());

    // Missing credentials abort the job before any work happens
    let source = EdamamClient::new(
        reqwest::Client::new(),
        config.edamam_app_id.clone(),
        config.edamam_app_key.clone(),
    )?;

    let database = db::Database::open(&config.database_path)?;
    database.with_conn(|conn| db::migrations::run_migrations(conn))?;

    let summary = run_backfill(&database, &source, RECIPE_DELAY).await;

    println!(
        "Backfill complete: {} processed, {} updated, {} failed",
        summary.processed, summary.updated, summary.failed
    );

    Ok(())
}
