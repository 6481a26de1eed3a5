//! Nutrition backfill job
//!
//! One-shot batch that fills in nutrition for recipes still missing it.
//! Each recipe is aggregated and written back independently; a failure
//! is logged and the batch moves on. A fixed sleep between recipes
//! keeps the provider rate limit happy. Re-running only touches recipes
//! whose nutrition is still NULL.

use std::time::Duration;

use crate::db::Database;
use crate::models::{Ingredient, IngredientCreate, Recipe};
use super::aggregator::{aggregate_nutrition, NutritionSource};

/// Default pause between recipes
pub const RECIPE_DELAY: Duration = Duration::from_secs(1);

/// Outcome of a backfill run
#[derive(Debug, Clone, Default)]
pub struct BackfillSummary {
    pub processed: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Fill in nutrition for every recipe that has none.
pub async fn run_backfill<S: NutritionSource + ?Sized>(
    db: &Database,
    source: &S,
    delay: Duration,
) -> BackfillSummary {
    let mut summary = BackfillSummary::default();

    let ids = match db.with_conn(|conn| Recipe::ids_missing_nutrition(conn)) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!("Failed to query recipes missing nutrition: {}", e);
            return summary;
        }
    };

    tracing::info!("Backfill: {} recipe(s) missing nutrition", ids.len());

    for (i, recipe_id) in ids.iter().enumerate() {
        summary.processed += 1;

        match backfill_recipe(db, source, *recipe_id).await {
            Ok(calories) => {
                summary.updated += 1;
                tracing::info!("Recipe {}: nutrition saved ({} kcal)", recipe_id, calories);
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!("Recipe {}: backfill failed: {}", recipe_id, e);
            }
        }

        if i + 1 < ids.len() {
            tokio::time::sleep(delay).await;
        }
    }

    tracing::info!(
        "Backfill done: {} processed, {} updated, {} failed",
        summary.processed,
        summary.updated,
        summary.failed
    );
    summary
}

/// Aggregate and persist nutrition for one recipe.
///
/// Returns the total calories written.
pub async fn backfill_recipe<S: NutritionSource + ?Sized>(
    db: &Database,
    source: &S,
    recipe_id: i64,
) -> Result<f64, crate::db::DbError> {
    let ingredients = db.with_conn(|conn| Ingredient::get_for_recipe(conn, recipe_id))?;

    let inputs: Vec<IngredientCreate> = ingredients
        .iter()
        .map(|i| IngredientCreate {
            name: i.name.clone(),
            quantity: i.quantity,
            unit: i.unit.clone(),
        })
        .collect();

    let result = aggregate_nutrition(source, &inputs).await;

    db.with_conn(|conn| {
        for (ingredient, fetched) in ingredients.iter().zip(result.per_ingredient.iter()) {
            if let Some(info) = fetched {
                Ingredient::update_nutrition(conn, ingredient.id, Some(info))?;
            }
        }
        Recipe::update_nutrition(conn, recipe_id, &result.total)
    })?;

    Ok(result.total.calories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NutritionalInfo, RecipeCreate};
    use crate::nutrition::aggregator::FetchError;
    use async_trait::async_trait;

    /// Stub source that errors for any ingredient named "poison"
    struct StubSource;

    #[async_trait]
    impl NutritionSource for StubSource {
        async fn fetch(
            &self,
            name: &str,
            quantity: f64,
            _unit: &str,
        ) -> Result<Option<NutritionalInfo>, FetchError> {
            if name == "poison" {
                return Err(FetchError::BadResponse("stub network failure".to_string()));
            }
            Ok(Some(NutritionalInfo {
                calories: quantity, // 1 kcal per gram keeps assertions easy
                ..NutritionalInfo::zero()
            }))
        }
    }

    fn seed_recipe(conn: &rusqlite::Connection, title: &str, ingredient_name: &str) -> i64 {
        let recipe = Recipe::create(
            conn,
            &RecipeCreate {
                title: title.to_string(),
                category: "Dinner".to_string(),
                region: "Test".to_string(),
                portions: 1,
                description: String::new(),
                image_url: None,
            },
        )
        .unwrap();
        Ingredient::create(
            conn,
            recipe.id,
            &IngredientCreate {
                name: ingredient_name.to_string(),
                quantity: 150.0,
                unit: "g".to_string(),
            },
        )
        .unwrap();
        recipe.id
    }

    #[tokio::test]
    async fn test_batch_continues_past_failures() {
        let db = Database::open_in_memory("backfill_continue").unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();

        let (first, second) = {
            let conn = db.get_conn().unwrap();
            (
                seed_recipe(&conn, "Good soup", "carrot"),
                seed_recipe(&conn, "Bad soup", "poison"),
            )
        };
        let third = {
            let conn = db.get_conn().unwrap();
            seed_recipe(&conn, "Another good soup", "potato")
        };

        let summary = run_backfill(&db, &StubSource, Duration::from_millis(0)).await;
        assert_eq!(summary.processed, 3);
        // A failing lookup contributes zero but the write still succeeds,
        // so every recipe ends up with a total.
        assert_eq!(summary.updated, 3);

        let conn = db.get_conn().unwrap();
        let good = Recipe::get_by_id(&conn, first).unwrap().unwrap();
        assert_eq!(good.nutrition.unwrap().calories, 150.0);

        let bad = Recipe::get_by_id(&conn, second).unwrap().unwrap();
        assert_eq!(bad.nutrition.unwrap().calories, 0.0);

        let other = Recipe::get_by_id(&conn, third).unwrap().unwrap();
        assert_eq!(other.nutrition.unwrap().calories, 150.0);
    }

    #[tokio::test]
    async fn test_rerun_skips_filled_recipes() {
        let db = Database::open_in_memory("backfill_rerun").unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();

        {
            let conn = db.get_conn().unwrap();
            seed_recipe(&conn, "Soup", "carrot");
        }

        let first = run_backfill(&db, &StubSource, Duration::from_millis(0)).await;
        assert_eq!(first.updated, 1);

        let second = run_backfill(&db, &StubSource, Duration::from_millis(0)).await;
        assert_eq!(second.processed, 0);
    }

    #[tokio::test]
    async fn test_per_ingredient_records_persisted() {
        let db = Database::open_in_memory("backfill_per_ingredient").unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();

        let recipe_id = {
            let conn = db.get_conn().unwrap();
            seed_recipe(&conn, "Mash", "potato")
        };

        backfill_recipe(&db, &StubSource, recipe_id).await.unwrap();

        let conn = db.get_conn().unwrap();
        let ingredients = Ingredient::get_for_recipe(&conn, recipe_id).unwrap();
        assert_eq!(ingredients[0].nutrition.as_ref().unwrap().calories, 150.0);
    }
}
