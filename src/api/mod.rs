//! HTTP API
//!
//! Axum routes over the shared application state. JSON in, JSON out;
//! errors become `{"error": ...}` envelopes via [`error::ApiError`].

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;

pub mod ai_recipes;
pub mod auth;
pub mod error;
pub mod favorites;
pub mod health;
pub mod ingredients;
pub mod recipes;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    /// Shared outbound HTTP client for all external providers
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth", post(auth::check_password))
        .route(
            "/api/recipes",
            get(recipes::list_recipes).post(recipes::create_recipe),
        )
        .route(
            "/api/recipes/:id",
            get(recipes::get_recipe).delete(recipes::delete_recipe),
        )
        .route("/api/recipes/:id/nutrition", post(recipes::compute_nutrition))
        .route(
            "/api/favorites",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route("/api/favorites/:recipe_id", delete(favorites::remove_favorite))
        .route("/api/ingredients", get(ingredients::list_ingredient_names))
        .route(
            "/api/ai-recipes",
            get(ai_recipes::list_ai_recipes).post(ai_recipes::generate_recipe),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
