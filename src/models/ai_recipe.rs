//! AI recipe model
//!
//! Stores recipes generated by the chat-completions API. The model's
//! JSON document is kept verbatim; the title is extracted for listing.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A stored AI-generated recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRecipe {
    pub id: i64,
    pub title: String,
    /// The generated recipe document, as returned by the model
    pub body: serde_json::Value,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl AiRecipe {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let raw: String = row.get("body")?;
        let body = serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null);
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            body,
            image_url: row.get("image_url")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Store a generated recipe
    pub fn create(
        conn: &Connection,
        title: &str,
        body: &serde_json::Value,
        image_url: Option<&str>,
    ) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO ai_recipes (title, body, image_url) VALUES (?1, ?2, ?3)",
            params![title, body.to_string(), image_url],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound)
    }

    /// Get a stored AI recipe by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ai_recipes WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List stored AI recipes, newest first
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn
            .prepare("SELECT * FROM ai_recipes ORDER BY id DESC LIMIT ?1 OFFSET ?2")?;

        let recipes = stmt
            .query_map(params![limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_store_and_list() {
        let db = Database::open_in_memory("ai_recipe_store").unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        let conn = db.get_conn().unwrap();

        let body = serde_json::json!({
            "title": "Lentil Soup",
            "ingredients": [{"name": "lentils", "quantity": 200, "unit": "g"}],
            "steps": ["Simmer lentils"]
        });
        let stored = AiRecipe::create(&conn, "Lentil Soup", &body, None).unwrap();
        assert_eq!(stored.body["title"], "Lentil Soup");

        let listed = AiRecipe::list(&conn, 10, 0).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Lentil Soup");
    }
}
