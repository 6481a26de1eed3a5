//! Recipe nutrition aggregation
//!
//! Sums per-ingredient nutrition lookups into a recipe total. Lookups
//! run strictly one after another to keep the provider rate-limit story
//! simple; an ingredient that fails to resolve contributes zero.

use async_trait::async_trait;

use crate::models::{IngredientCreate, NutritionalInfo};
use super::units::normalize_to_grams;

/// Error from a nutrition provider call
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Nutrition provider not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Unexpected provider response: {0}")]
    BadResponse(String),
}

/// A source of per-ingredient nutrition data.
///
/// `Ok(None)` means the provider had no usable data for the ingredient
/// (including a zero-calorie response); it is not an error.
#[async_trait]
pub trait NutritionSource: Send + Sync {
    async fn fetch(
        &self,
        name: &str,
        quantity: f64,
        unit: &str,
    ) -> Result<Option<NutritionalInfo>, FetchError>;
}

/// Aggregation result: the rounded total plus the per-ingredient
/// records in input order (None where the lookup had no data).
#[derive(Debug, Clone)]
pub struct AggregatedNutrition {
    pub total: NutritionalInfo,
    pub per_ingredient: Vec<Option<NutritionalInfo>>,
}

/// Sum nutrition over an ingredient list.
///
/// Each ingredient is normalized to grams where possible, then fetched
/// sequentially from the source. Failed lookups are logged and add
/// zero; nothing distinguishes "zero nutrition" from "lookup failed" in
/// the total. The total is rounded (calories to integer, the rest to
/// one decimal).
pub async fn aggregate_nutrition<S: NutritionSource + ?Sized>(
    source: &S,
    ingredients: &[IngredientCreate],
) -> AggregatedNutrition {
    let mut total = NutritionalInfo::zero();
    let mut per_ingredient = Vec::with_capacity(ingredients.len());

    for ingredient in ingredients {
        let (quantity, unit) =
            normalize_to_grams(&ingredient.name, ingredient.quantity, &ingredient.unit);

        let fetched = match source.fetch(&ingredient.name, quantity, &unit).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Nutrition lookup failed for '{}': {}", ingredient.name, e);
                None
            }
        };

        if let Some(ref info) = fetched {
            total = total + info.clone();
        }
        per_ingredient.push(fetched);
    }

    AggregatedNutrition {
        total: total.rounded(),
        per_ingredient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stub source: fixed record per matching name, error for "bad",
    /// no data otherwise.
    struct StubSource {
        known: Vec<(String, NutritionalInfo)>,
    }

    #[async_trait]
    impl NutritionSource for StubSource {
        async fn fetch(
            &self,
            name: &str,
            _quantity: f64,
            _unit: &str,
        ) -> Result<Option<NutritionalInfo>, FetchError> {
            if name == "bad" {
                return Err(FetchError::BadResponse("stub failure".to_string()));
            }
            Ok(self
                .known
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, info)| info.clone()))
        }
    }

    fn ingredient(name: &str) -> IngredientCreate {
        IngredientCreate {
            name: name.to_string(),
            quantity: 100.0,
            unit: "g".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_list_is_all_zero() {
        let source = StubSource { known: vec![] };
        let result = aggregate_nutrition(&source, &[]).await;
        assert_eq!(result.total, NutritionalInfo::zero());
        assert!(result.per_ingredient.is_empty());
    }

    #[tokio::test]
    async fn test_three_identical_ingredients_sum() {
        let info = NutritionalInfo {
            calories: 100.0,
            protein: 4.1,
            ..NutritionalInfo::zero()
        };
        let source = StubSource {
            known: vec![("rice".to_string(), info)],
        };

        let ingredients = vec![ingredient("rice"), ingredient("rice"), ingredient("rice")];
        let result = aggregate_nutrition(&source, &ingredients).await;
        assert_eq!(result.total.calories, 300.0);
        // 3 * 4.1 = 12.299999..., rounded to one decimal
        assert_eq!(result.total.protein, 12.3);
    }

    #[tokio::test]
    async fn test_rounding_of_total() {
        let source = StubSource {
            known: vec![(
                "butter".to_string(),
                NutritionalInfo {
                    calories: 104.6,
                    fat: 12.34,
                    ..NutritionalInfo::zero()
                },
            )],
        };

        let result = aggregate_nutrition(&source, &[ingredient("butter")]).await;
        assert_eq!(result.total.calories, 105.0);
        assert_eq!(result.total.fat, 12.3);
    }

    #[tokio::test]
    async fn test_no_data_contributes_zero() {
        let source = StubSource {
            known: vec![(
                "rice".to_string(),
                NutritionalInfo { calories: 100.0, ..NutritionalInfo::zero() },
            )],
        };

        let ingredients = vec![ingredient("rice"), ingredient("mystery")];
        let result = aggregate_nutrition(&source, &ingredients).await;
        assert_eq!(result.total.calories, 100.0);
        assert_eq!(result.per_ingredient.len(), 2);
        assert!(result.per_ingredient[0].is_some());
        assert!(result.per_ingredient[1].is_none());
    }

    /// Records what the source is asked for
    struct RecordingSource {
        calls: std::sync::Mutex<Vec<(String, f64, String)>>,
    }

    #[async_trait]
    impl NutritionSource for RecordingSource {
        async fn fetch(
            &self,
            name: &str,
            quantity: f64,
            unit: &str,
        ) -> Result<Option<NutritionalInfo>, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), quantity, unit.to_string()));
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_whole_eggs_normalized_before_fetch() {
        let source = RecordingSource {
            calls: std::sync::Mutex::new(Vec::new()),
        };

        let ingredients = vec![IngredientCreate {
            name: "egg".to_string(),
            quantity: 2.0,
            unit: "whole".to_string(),
        }];
        aggregate_nutrition(&source, &ingredients).await;

        let calls = source.calls.lock().unwrap();
        // 2 whole eggs at 50 g average reach the provider as 100 g
        assert_eq!(calls[0], ("egg".to_string(), 100.0, "g".to_string()));
    }

    #[tokio::test]
    async fn test_failed_lookup_contributes_zero() {
        let source = StubSource {
            known: vec![(
                "rice".to_string(),
                NutritionalInfo { calories: 100.0, ..NutritionalInfo::zero() },
            )],
        };

        let ingredients = vec![ingredient("bad"), ingredient("rice")];
        let result = aggregate_nutrition(&source, &ingredients).await;
        assert_eq!(result.total.calories, 100.0);
        assert!(result.per_ingredient[0].is_none());
    }
}
