//! AI recipe endpoints
//!
//! Generation builds a prompt from the submitted ingredient list, asks
//! the chat-completions API for a schema-constrained recipe document,
//! attaches a best-effort image, and stores the result.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::external::{GenerateError, ImageSearch, OpenAiClient};
use crate::models::AiRecipe;
use super::error::{ApiError, ApiResult};
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRecipeRequest {
    pub ingredients: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListAiRecipesQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct ListAiRecipesResponse {
    pub recipes: Vec<AiRecipe>,
}

/// POST /api/ai-recipes
pub async fn generate_recipe(
    State(state): State<AppState>,
    Json(request): Json<GenerateRecipeRequest>,
) -> ApiResult<(StatusCode, Json<AiRecipe>)> {
    let ingredients: Vec<String> = request
        .ingredients
        .iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if ingredients.is_empty() {
        return Err(ApiError::BadRequest(
            "at least one ingredient is required".to_string(),
        ));
    }

    let client = OpenAiClient::new(state.http.clone(), state.config.openai_api_key.clone())
        .map_err(|_| ApiError::Config("OPENAI_API_KEY is not set".to_string()))?;

    let body = client.generate_recipe(&ingredients).await.map_err(|e| match e {
        GenerateError::NotConfigured => ApiError::Config("OPENAI_API_KEY is not set".to_string()),
        other => ApiError::Upstream(other.to_string()),
    })?;

    let title = body["title"].as_str().unwrap_or("Untitled recipe").to_string();

    // Image lookup is best effort; a recipe without an image is fine
    let image_search = ImageSearch::new(state.http.clone(), &state.config);
    let image_url = image_search.find_image(&title).await;

    let stored = state
        .db
        .with_conn(|conn| AiRecipe::create(conn, &title, &body, image_url.as_deref()))?;

    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/ai-recipes
pub async fn list_ai_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListAiRecipesQuery>,
) -> ApiResult<Json<ListAiRecipesResponse>> {
    let limit = params.limit.clamp(1, 200);
    let offset = params.offset.max(0);

    let recipes = state
        .db
        .with_conn(|conn| AiRecipe::list(conn, limit, offset))?;

    Ok(Json(ListAiRecipesResponse { recipes }))
}
