//! Ingredient name endpoint
//!
//! Serves the deduplicated name list backing the search filter.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::models::Ingredient;
use super::error::ApiResult;
use super::AppState;

#[derive(Debug, Serialize)]
pub struct ListIngredientsResponse {
    pub ingredients: Vec<String>,
}

/// GET /api/ingredients
pub async fn list_ingredient_names(
    State(state): State<AppState>,
) -> ApiResult<Json<ListIngredientsResponse>> {
    let ingredients = state.db.with_conn(|conn| Ingredient::list_names(conn))?;
    Ok(Json(ListIngredientsResponse { ingredients }))
}
