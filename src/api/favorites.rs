//! Favorite endpoints
//!
//! All operations act on behalf of the single fixed user.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_USER_ID;
use crate::models::{Favorite, Recipe};
use super::error::{ApiError, ApiResult};
use super::AppState;

/// A favorite joined with its recipe summary
#[derive(Debug, Serialize)]
pub struct FavoriteEntry {
    pub recipe_id: i64,
    pub title: String,
    pub category: String,
    pub region: String,
    pub image_url: Option<String>,
    pub favorited_at: String,
}

#[derive(Debug, Serialize)]
pub struct ListFavoritesResponse {
    pub favorites: Vec<FavoriteEntry>,
}

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub recipe_id: i64,
}

#[derive(Debug, Serialize)]
pub struct FavoriteChangedResponse {
    pub success: bool,
}

/// GET /api/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
) -> ApiResult<Json<ListFavoritesResponse>> {
    let favorites = state.db.with_conn(|conn| {
        let rows = Favorite::list_for_user(conn, DEFAULT_USER_ID)?;
        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(recipe) = Recipe::get_by_id(conn, row.recipe_id)? {
                entries.push(FavoriteEntry {
                    recipe_id: recipe.id,
                    title: recipe.title,
                    category: recipe.category,
                    region: recipe.region,
                    image_url: recipe.image_url,
                    favorited_at: row.created_at,
                });
            }
        }
        Ok(entries)
    })?;

    Ok(Json(ListFavoritesResponse { favorites }))
}

/// POST /api/favorites
pub async fn add_favorite(
    State(state): State<AppState>,
    Json(request): Json<AddFavoriteRequest>,
) -> ApiResult<(StatusCode, Json<FavoriteChangedResponse>)> {
    let added = state.db.with_conn(|conn| {
        if Recipe::get_by_id(conn, request.recipe_id)?.is_none() {
            return Ok(false);
        }
        Favorite::add(conn, DEFAULT_USER_ID, request.recipe_id)?;
        Ok(true)
    })?;

    if !added {
        return Err(ApiError::NotFound(format!(
            "Recipe {} not found",
            request.recipe_id
        )));
    }

    Ok((StatusCode::CREATED, Json(FavoriteChangedResponse { success: true })))
}

/// DELETE /api/favorites/:recipe_id
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> ApiResult<Json<FavoriteChangedResponse>> {
    let removed = state
        .db
        .with_conn(|conn| Favorite::remove(conn, DEFAULT_USER_ID, recipe_id))?;

    if !removed {
        return Err(ApiError::NotFound(format!(
            "Recipe {} is not a favorite",
            recipe_id
        )));
    }

    Ok(Json(FavoriteChangedResponse { success: true }))
}
