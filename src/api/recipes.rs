//! Recipe endpoints
//!
//! CRUD plus the on-demand nutrition computation. Recipe creation
//! accepts the full JSON document (ingredients and steps included);
//! nutrition is filled in later by the nutrition endpoint or the
//! backfill job.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_USER_ID;
use crate::external::EdamamClient;
use crate::models::{
    Favorite, Ingredient, IngredientCreate, NutritionalInfo, Recipe, RecipeCreate, RecipeFilter,
    Step,
};
use crate::nutrition::{aggregate_nutrition, FetchError};
use super::error::{ApiError, ApiResult};
use super::AppState;

/// Query parameters for GET /api/recipes
#[derive(Debug, Deserialize)]
pub struct ListRecipesQuery {
    pub query: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub ingredient: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Recipe summary for listings
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub region: String,
    pub portions: i64,
    pub image_url: Option<String>,
    pub calories: Option<f64>,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Request body for POST /api/recipes
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    #[serde(flatten)]
    pub recipe: RecipeCreate,
    #[serde(default)]
    pub ingredients: Vec<IngredientCreate>,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Full recipe detail
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub region: String,
    pub portions: i64,
    pub description: String,
    pub image_url: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub nutrition: Option<NutritionalInfo>,
    pub is_favorite: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Query parameters for GET /api/recipes/:id
#[derive(Debug, Deserialize)]
pub struct RecipeDetailQuery {
    /// When present, displayed nutrition is scaled linearly to this
    /// portion count.
    pub portions: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Response for POST /api/recipes/:id/nutrition
#[derive(Debug, Serialize)]
pub struct ComputeNutritionResponse {
    pub recipe_id: i64,
    pub nutrition: NutritionalInfo,
    /// Per-ingredient lookup results in recipe order; null where the
    /// provider had no data.
    pub per_ingredient: Vec<Option<NutritionalInfo>>,
}

/// GET /api/recipes
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListRecipesQuery>,
) -> ApiResult<Json<ListRecipesResponse>> {
    let filter = RecipeFilter {
        query: params.query,
        category: params.category,
        region: params.region,
        ingredient: params.ingredient,
        favorites_only: params.favorites_only,
        limit: params.limit.clamp(1, 200),
        offset: params.offset.max(0),
    };

    let (recipes, total, favorites) = state.db.with_conn(|conn| {
        let recipes = Recipe::list(conn, &filter)?;
        let total = Recipe::count(conn, &filter)?;
        let favorites: Vec<bool> = recipes
            .iter()
            .map(|r| Favorite::exists(conn, DEFAULT_USER_ID, r.id))
            .collect::<Result<_, _>>()?;
        Ok((recipes, total, favorites))
    })?;

    let summaries = recipes
        .into_iter()
        .zip(favorites)
        .map(|(r, is_favorite)| RecipeSummary {
            id: r.id,
            title: r.title,
            category: r.category,
            region: r.region,
            portions: r.portions,
            image_url: r.image_url,
            calories: r.nutrition.map(|n| n.calories),
            is_favorite,
        })
        .collect();

    Ok(Json(ListRecipesResponse {
        recipes: summaries,
        total,
        limit: filter.limit,
        offset: filter.offset,
    }))
}

/// POST /api/recipes
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(request): Json<CreateRecipeRequest>,
) -> ApiResult<(StatusCode, Json<RecipeDetail>)> {
    validate_create(&request)?;

    let recipe_id = state.db.with_conn(|conn| {
        let recipe = Recipe::create(conn, &request.recipe)?;
        for ingredient in &request.ingredients {
            Ingredient::create(conn, recipe.id, ingredient)?;
        }
        for description in &request.steps {
            Step::append(conn, recipe.id, description)?;
        }
        Ok(recipe.id)
    })?;

    let detail = load_detail(&state, recipe_id, None)?
        .ok_or_else(|| ApiError::NotFound(format!("Recipe {} not found", recipe_id)))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

fn validate_create(request: &CreateRecipeRequest) -> ApiResult<()> {
    if request.recipe.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title is required".to_string()));
    }
    if request.recipe.category.trim().is_empty() {
        return Err(ApiError::BadRequest("category is required".to_string()));
    }
    if request.recipe.region.trim().is_empty() {
        return Err(ApiError::BadRequest("region is required".to_string()));
    }
    if request.recipe.portions < 1 {
        return Err(ApiError::BadRequest("portions must be at least 1".to_string()));
    }
    for ingredient in &request.ingredients {
        if ingredient.name.trim().is_empty() {
            return Err(ApiError::BadRequest("ingredient name is required".to_string()));
        }
        if ingredient.quantity < 0.0 {
            return Err(ApiError::BadRequest(format!(
                "ingredient '{}' has a negative quantity",
                ingredient.name
            )));
        }
    }
    for step in &request.steps {
        if step.trim().is_empty() {
            return Err(ApiError::BadRequest("steps cannot be empty".to_string()));
        }
    }
    Ok(())
}

/// GET /api/recipes/:id
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<RecipeDetailQuery>,
) -> ApiResult<Json<RecipeDetail>> {
    let detail = load_detail(&state, id, params.portions)?
        .ok_or_else(|| ApiError::NotFound(format!("Recipe {} not found", id)))?;
    Ok(Json(detail))
}

fn load_detail(
    state: &AppState,
    id: i64,
    display_portions: Option<i64>,
) -> Result<Option<RecipeDetail>, ApiError> {
    let loaded = state.db.with_conn(|conn| {
        let recipe = match Recipe::get_by_id(conn, id)? {
            Some(recipe) => recipe,
            None => return Ok(None),
        };
        let ingredients = Ingredient::get_for_recipe(conn, id)?;
        let steps = Step::get_for_recipe(conn, id)?;
        let is_favorite = Favorite::exists(conn, DEFAULT_USER_ID, id)?;
        Ok(Some((recipe, ingredients, steps, is_favorite)))
    })?;

    let (recipe, ingredients, steps, is_favorite) = match loaded {
        Some(parts) => parts,
        None => return Ok(None),
    };

    // Displayed nutrition scales linearly with the requested portions
    let nutrition = match (recipe.nutrition, display_portions) {
        (Some(n), Some(portions)) if portions >= 1 && recipe.portions >= 1 => {
            Some(n.scale(portions as f64 / recipe.portions as f64).rounded())
        }
        (n, _) => n,
    };

    Ok(Some(RecipeDetail {
        id: recipe.id,
        title: recipe.title,
        category: recipe.category,
        region: recipe.region,
        portions: recipe.portions,
        description: recipe.description,
        image_url: recipe.image_url,
        ingredients,
        steps,
        nutrition,
        is_favorite,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    }))
}

/// DELETE /api/recipes/:id
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.db.with_conn(|conn| Recipe::delete(conn, id))?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Recipe {} not found", id)));
    }
    Ok(Json(DeleteResponse { success: true }))
}

/// POST /api/recipes/:id/nutrition
///
/// Computes nutrition for one recipe via the configured provider and
/// persists the total and per-ingredient records.
pub async fn compute_nutrition(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ComputeNutritionResponse>> {
    let source = EdamamClient::new(
        state.http.clone(),
        state.config.edamam_app_id.clone(),
        state.config.edamam_app_key.clone(),
    )
    .map_err(|e| match e {
        FetchError::NotConfigured(what) => ApiError::Config(what.to_string()),
        other => ApiError::Upstream(other.to_string()),
    })?;

    let ingredients = state
        .db
        .with_conn(|conn| {
            Recipe::get_by_id(conn, id)?.ok_or(crate::db::DbError::NotFound)?;
            Ingredient::get_for_recipe(conn, id)
        })
        .map_err(|e| match e {
            crate::db::DbError::NotFound => {
                ApiError::NotFound(format!("Recipe {} not found", id))
            }
            other => ApiError::Db(other),
        })?;

    let inputs: Vec<IngredientCreate> = ingredients
        .iter()
        .map(|i| IngredientCreate {
            name: i.name.clone(),
            quantity: i.quantity,
            unit: i.unit.clone(),
        })
        .collect();

    let result = aggregate_nutrition(&source, &inputs).await;

    state.db.with_conn(|conn| {
        for (ingredient, fetched) in ingredients.iter().zip(result.per_ingredient.iter()) {
            if let Some(info) = fetched {
                Ingredient::update_nutrition(conn, ingredient.id, Some(info))?;
            }
        }
        Recipe::update_nutrition(conn, id, &result.total)
    })?;

    Ok(Json(ComputeNutritionResponse {
        recipe_id: id,
        nutrition: result.total,
        per_ingredient: result.per_ingredient,
    }))
}
