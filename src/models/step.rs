//! Step model
//!
//! Ordered preparation steps belonging to one recipe. Order is 1-based
//! and assigned at insertion time.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A preparation step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub id: i64,
    pub recipe_id: i64,
    pub step_order: i64,
    pub description: String,
}

impl Step {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            recipe_id: row.get("recipe_id")?,
            step_order: row.get("step_order")?,
            description: row.get("description")?,
        })
    }

    /// Append a step to a recipe, assigning the next 1-based order
    pub fn append(conn: &Connection, recipe_id: i64, description: &str) -> DbResult<Self> {
        let next_order: i64 = conn.query_row(
            "SELECT COALESCE(MAX(step_order), 0) + 1 FROM steps WHERE recipe_id = ?1",
            [recipe_id],
            |row| row.get(0),
        )?;

        conn.execute(
            "INSERT INTO steps (recipe_id, step_order, description) VALUES (?1, ?2, ?3)",
            params![recipe_id, next_order, description],
        )?;

        Ok(Self {
            id: conn.last_insert_rowid(),
            recipe_id,
            step_order: next_order,
            description: description.to_string(),
        })
    }

    /// Get all steps for a recipe in order
    pub fn get_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM steps WHERE recipe_id = ?1 ORDER BY step_order")?;

        let steps = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Recipe, RecipeCreate};

    #[test]
    fn test_order_assigned_at_insertion() {
        let db = Database::open_in_memory("step_order").unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        let conn = db.get_conn().unwrap();

        let recipe = Recipe::create(
            &conn,
            &RecipeCreate {
                title: "Toast".to_string(),
                category: "Breakfast".to_string(),
                region: "Anywhere".to_string(),
                portions: 1,
                description: String::new(),
                image_url: None,
            },
        )
        .unwrap();

        let first = Step::append(&conn, recipe.id, "Slice bread").unwrap();
        let second = Step::append(&conn, recipe.id, "Toast it").unwrap();
        assert_eq!(first.step_order, 1);
        assert_eq!(second.step_order, 2);

        let steps = Step::get_for_recipe(&conn, recipe.id).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].description, "Slice bread");
    }
}
