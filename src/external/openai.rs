//! OpenAI chat-completions client
//!
//! Generates a recipe from an ingredient list using a JSON-schema
//! constrained response. One recovery attempt is made on malformed
//! model output (extracting the outermost JSON object), otherwise the
//! call fails.

use serde::{Deserialize, Serialize};
use serde_json::json;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";

/// Error from recipe generation
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("OPENAI_API_KEY is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Model returned no choices")]
    EmptyResponse,

    #[error("Model output was not valid JSON")]
    MalformedJson,
}

/// OpenAI recipe generator
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: String,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Result<Self, GenerateError> {
        match api_key {
            Some(api_key) => Ok(Self { http, api_key }),
            None => Err(GenerateError::NotConfigured),
        }
    }

    /// Generate a recipe using the given ingredients.
    ///
    /// Returns the parsed recipe document; schema mirrors the catalog's
    /// recipe shape (title, category, region, portions, description,
    /// ingredients, steps).
    pub async fn generate_recipe(
        &self,
        ingredients: &[String],
    ) -> Result<serde_json::Value, GenerateError> {
        let prompt = format!(
            "Create a single realistic recipe using these ingredients: {}. \
             Quantities use metric units where possible.",
            ingredients.join(", ")
        );

        let body = json!({
            "model": MODEL,
            "messages": [
                ChatMessage {
                    role: "system",
                    content: "You are a chef writing structured recipes.".to_string(),
                },
                ChatMessage { role: "user", content: prompt },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "recipe",
                    "schema": recipe_schema(),
                    "strict": true
                }
            }
        });

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerateError::Status(response.status()));
        }

        let payload: ChatResponse = response.json().await?;
        let content = payload
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or(GenerateError::EmptyResponse)?;

        parse_recipe_json(&content)
    }
}

/// JSON schema the model must satisfy
fn recipe_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["title", "category", "region", "portions", "description", "ingredients", "steps"],
        "properties": {
            "title": {"type": "string"},
            "category": {"type": "string"},
            "region": {"type": "string"},
            "portions": {"type": "integer", "minimum": 1},
            "description": {"type": "string"},
            "ingredients": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["name", "quantity", "unit"],
                    "properties": {
                        "name": {"type": "string"},
                        "quantity": {"type": "number"},
                        "unit": {"type": "string"}
                    }
                }
            },
            "steps": {"type": "array", "items": {"type": "string"}}
        }
    })
}

/// Parse model output, with one recovery attempt for content wrapped in
/// prose or code fences: take the substring from the first '{' to the
/// last '}'.
fn parse_recipe_json(content: &str) -> Result<serde_json::Value, GenerateError> {
    if let Ok(value) = serde_json::from_str(content) {
        return Ok(value);
    }

    let start = content.find('{');
    let end = content.rfind('}');
    if let (Some(start), Some(end)) = (start, end) {
        if start < end {
            if let Ok(value) = serde_json::from_str(&content[start..=end]) {
                return Ok(value);
            }
        }
    }

    Err(GenerateError::MalformedJson)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_json() {
        let value = parse_recipe_json(r#"{"title": "Soup"}"#).unwrap();
        assert_eq!(value["title"], "Soup");
    }

    #[test]
    fn test_recovery_from_fenced_json() {
        let content = "Here is your recipe:\n```json\n{\"title\": \"Stew\"}\n```";
        let value = parse_recipe_json(content).unwrap();
        assert_eq!(value["title"], "Stew");
    }

    #[test]
    fn test_unrecoverable_output() {
        assert!(matches!(
            parse_recipe_json("I cannot produce a recipe."),
            Err(GenerateError::MalformedJson)
        ));
    }
}
