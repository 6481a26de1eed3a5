//! Edamam nutrition-data client
//!
//! One GET per ingredient. A non-2xx status or a zero-calorie answer is
//! treated as "no data" rather than a hard error. No retry, no backoff;
//! the shared client's defaults apply.

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::NutritionalInfo;
use crate::nutrition::{FetchError, NutritionSource};

const NUTRITION_DATA_URL: &str = "https://api.edamam.com/api/nutrition-data";

/// Edamam nutrition-data API client
#[derive(Clone)]
pub struct EdamamClient {
    http: reqwest::Client,
    app_id: String,
    app_key: String,
}

/// Provider payload, reduced to the fields we map
#[derive(Debug, Deserialize)]
struct NutritionDataResponse {
    #[serde(default)]
    calories: f64,
    #[serde(rename = "totalNutrients", default)]
    total_nutrients: TotalNutrients,
}

/// Fixed mapping from Edamam nutrient codes to the eight-field record.
/// Fields absent from the response default to zero.
#[derive(Debug, Default, Deserialize)]
struct TotalNutrients {
    #[serde(rename = "ENERC_KCAL", default)]
    energy: Nutrient,
    #[serde(rename = "PROCNT", default)]
    protein: Nutrient,
    #[serde(rename = "FAT", default)]
    fat: Nutrient,
    #[serde(rename = "CHOCDF", default)]
    carbohydrates: Nutrient,
    #[serde(rename = "FIBTG", default)]
    fiber: Nutrient,
    #[serde(rename = "SUGAR", default)]
    sugar: Nutrient,
    #[serde(rename = "NA", default)]
    sodium: Nutrient,
    #[serde(rename = "CHOLE", default)]
    cholesterol: Nutrient,
}

#[derive(Debug, Default, Deserialize)]
struct Nutrient {
    #[serde(default)]
    quantity: f64,
}

impl EdamamClient {
    /// Build a client; fails when credentials are absent
    pub fn new(
        http: reqwest::Client,
        app_id: Option<String>,
        app_key: Option<String>,
    ) -> Result<Self, FetchError> {
        match (app_id, app_key) {
            (Some(app_id), Some(app_key)) => Ok(Self { http, app_id, app_key }),
            _ => Err(FetchError::NotConfigured("EDAMAM_APP_ID / EDAMAM_APP_KEY")),
        }
    }

    fn map_response(response: NutritionDataResponse) -> Option<NutritionalInfo> {
        let n = response.total_nutrients;
        let calories = if response.calories > 0.0 {
            response.calories
        } else {
            n.energy.quantity
        };

        // Zero calories means the provider did not recognize the food
        if calories == 0.0 {
            return None;
        }

        Some(NutritionalInfo {
            calories,
            protein: n.protein.quantity,
            fat: n.fat.quantity,
            carbohydrates: n.carbohydrates.quantity,
            fiber: n.fiber.quantity,
            sugar: n.sugar.quantity,
            sodium: n.sodium.quantity,
            cholesterol: n.cholesterol.quantity,
        })
    }
}

#[async_trait]
impl NutritionSource for EdamamClient {
    async fn fetch(
        &self,
        name: &str,
        quantity: f64,
        unit: &str,
    ) -> Result<Option<NutritionalInfo>, FetchError> {
        let ingr = format!("{} {} {}", quantity, unit, name);

        let response = self
            .http
            .get(NUTRITION_DATA_URL)
            .query(&[
                ("app_id", self.app_id.as_str()),
                ("app_key", self.app_key.as_str()),
                ("ingr", ingr.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(
                "Edamam returned {} for '{}'; treating as no data",
                response.status(),
                ingr
            );
            return Ok(None);
        }

        let payload: NutritionDataResponse = response.json().await?;
        Ok(Self::map_response(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_full_response() {
        let payload: NutritionDataResponse = serde_json::from_value(serde_json::json!({
            "calories": 155.0,
            "totalNutrients": {
                "ENERC_KCAL": {"quantity": 155.0},
                "PROCNT": {"quantity": 12.6},
                "FAT": {"quantity": 10.6},
                "CHOCDF": {"quantity": 1.1},
                "FIBTG": {"quantity": 0.0},
                "SUGAR": {"quantity": 1.1},
                "NA": {"quantity": 124.0},
                "CHOLE": {"quantity": 373.0}
            }
        }))
        .unwrap();

        let info = EdamamClient::map_response(payload).unwrap();
        assert_eq!(info.calories, 155.0);
        assert_eq!(info.protein, 12.6);
        assert_eq!(info.sodium, 124.0);
        assert_eq!(info.cholesterol, 373.0);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let payload: NutritionDataResponse = serde_json::from_value(serde_json::json!({
            "calories": 42.0,
            "totalNutrients": {"PROCNT": {"quantity": 3.0}}
        }))
        .unwrap();

        let info = EdamamClient::map_response(payload).unwrap();
        assert_eq!(info.calories, 42.0);
        assert_eq!(info.protein, 3.0);
        assert_eq!(info.fat, 0.0);
        assert_eq!(info.fiber, 0.0);
    }

    #[test]
    fn test_zero_calories_is_no_data() {
        let payload: NutritionDataResponse =
            serde_json::from_value(serde_json::json!({"calories": 0.0})).unwrap();
        assert!(EdamamClient::map_response(payload).is_none());
    }

    #[test]
    fn test_unconfigured_client() {
        let result = EdamamClient::new(reqwest::Client::new(), None, None);
        assert!(matches!(result, Err(FetchError::NotConfigured(_))));
    }
}
