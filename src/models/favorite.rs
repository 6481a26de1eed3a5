//! Favorite model
//!
//! Joins a user to a recipe. The application runs with a single fixed
//! user id supplied by the caller.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A favorite row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub user_id: String,
    pub recipe_id: i64,
    pub created_at: String,
}

impl Favorite {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            recipe_id: row.get("recipe_id")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Mark a recipe as favorite; idempotent for the same user/recipe pair
    pub fn add(conn: &Connection, user_id: &str, recipe_id: i64) -> DbResult<()> {
        conn.execute(
            "INSERT OR IGNORE INTO favorites (user_id, recipe_id) VALUES (?1, ?2)",
            params![user_id, recipe_id],
        )?;
        Ok(())
    }

    /// Remove a favorite; returns false when it did not exist
    pub fn remove(conn: &Connection, user_id: &str, recipe_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM favorites WHERE user_id = ?1 AND recipe_id = ?2",
            params![user_id, recipe_id],
        )?;
        Ok(rows > 0)
    }

    /// List a user's favorites, newest first
    pub fn list_for_user(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM favorites WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;

        let favorites = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(favorites)
    }

    /// Check whether a recipe is a favorite of the user
    pub fn exists(conn: &Connection, user_id: &str, recipe_id: i64) -> DbResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM favorites WHERE user_id = ?1 AND recipe_id = ?2",
            params![user_id, recipe_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Recipe, RecipeCreate};

    #[test]
    fn test_add_remove_idempotent() {
        let db = Database::open_in_memory("favorite_add").unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        let conn = db.get_conn().unwrap();

        let recipe = Recipe::create(
            &conn,
            &RecipeCreate {
                title: "Dal".to_string(),
                category: "Dinner".to_string(),
                region: "India".to_string(),
                portions: 4,
                description: String::new(),
                image_url: None,
            },
        )
        .unwrap();

        Favorite::add(&conn, "default", recipe.id).unwrap();
        Favorite::add(&conn, "default", recipe.id).unwrap();
        assert_eq!(Favorite::list_for_user(&conn, "default").unwrap().len(), 1);
        assert!(Favorite::exists(&conn, "default", recipe.id).unwrap());

        assert!(Favorite::remove(&conn, "default", recipe.id).unwrap());
        assert!(!Favorite::remove(&conn, "default", recipe.id).unwrap());
    }
}
