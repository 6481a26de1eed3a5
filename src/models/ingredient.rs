//! Ingredient model
//!
//! Ingredients are scoped to one recipe. A separate deduplicated name
//! table backs the ingredient filter in search.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::NutritionalInfo;

/// An ingredient row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    /// Per-ingredient lookup result, when the nutrition API had data
    pub nutrition: Option<NutritionalInfo>,
}

/// Ingredient data as submitted with a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl Ingredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let calories: Option<f64> = row.get("calories")?;
        let nutrition = match calories {
            Some(calories) => Some(NutritionalInfo {
                calories,
                protein: row.get::<_, Option<f64>>("protein")?.unwrap_or(0.0),
                fat: row.get::<_, Option<f64>>("fat")?.unwrap_or(0.0),
                carbohydrates: row.get::<_, Option<f64>>("carbohydrates")?.unwrap_or(0.0),
                fiber: row.get::<_, Option<f64>>("fiber")?.unwrap_or(0.0),
                sugar: row.get::<_, Option<f64>>("sugar")?.unwrap_or(0.0),
                sodium: row.get::<_, Option<f64>>("sodium")?.unwrap_or(0.0),
                cholesterol: row.get::<_, Option<f64>>("cholesterol")?.unwrap_or(0.0),
            }),
            None => None,
        };

        Ok(Self {
            id: row.get("id")?,
            recipe_id: row.get("recipe_id")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            nutrition,
        })
    }

    /// Add an ingredient to a recipe and record its name in the
    /// deduplicated lookup table.
    pub fn create(conn: &Connection, recipe_id: i64, data: &IngredientCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO ingredients (recipe_id, name, quantity, unit)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![recipe_id, data.name, data.quantity, data.unit],
        )?;
        let id = conn.last_insert_rowid();

        conn.execute(
            "INSERT OR IGNORE INTO ingredient_names (name) VALUES (?1)",
            params![data.name.trim().to_lowercase()],
        )?;

        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound)
    }

    /// Get an ingredient by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all ingredients for a recipe, in insertion order
    pub fn get_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM ingredients WHERE recipe_id = ?1 ORDER BY id")?;

        let ingredients = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ingredients)
    }

    /// Persist the per-ingredient nutrition lookup result (or clear it)
    pub fn update_nutrition(
        conn: &Connection,
        id: i64,
        nutrition: Option<&NutritionalInfo>,
    ) -> DbResult<()> {
        let zero = NutritionalInfo::zero();
        let n = nutrition.unwrap_or(&zero);
        conn.execute(
            r#"
            UPDATE ingredients SET
                calories = ?1, protein = ?2, fat = ?3, carbohydrates = ?4,
                fiber = ?5, sugar = ?6, sodium = ?7, cholesterol = ?8
            WHERE id = ?9
            "#,
            params![
                nutrition.map(|_| n.calories),
                nutrition.map(|_| n.protein),
                nutrition.map(|_| n.fat),
                nutrition.map(|_| n.carbohydrates),
                nutrition.map(|_| n.fiber),
                nutrition.map(|_| n.sugar),
                nutrition.map(|_| n.sodium),
                nutrition.map(|_| n.cholesterol),
                id,
            ],
        )?;
        Ok(())
    }

    /// List all deduplicated ingredient names (search filter source)
    pub fn list_names(conn: &Connection) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare("SELECT name FROM ingredient_names ORDER BY name")?;

        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Recipe, RecipeCreate};

    fn test_db(name: &str) -> Database {
        let db = Database::open_in_memory(name).unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        db
    }

    fn make_recipe(conn: &rusqlite::Connection) -> Recipe {
        Recipe::create(
            conn,
            &RecipeCreate {
                title: "Omelette".to_string(),
                category: "Breakfast".to_string(),
                region: "France".to_string(),
                portions: 1,
                description: String::new(),
                image_url: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_dedup_names() {
        let db = test_db("ingredient_create");
        let conn = db.get_conn().unwrap();
        let recipe = make_recipe(&conn);

        let egg = IngredientCreate {
            name: "Egg".to_string(),
            quantity: 2.0,
            unit: "whole".to_string(),
        };
        Ingredient::create(&conn, recipe.id, &egg).unwrap();
        Ingredient::create(&conn, recipe.id, &egg).unwrap();

        assert_eq!(Ingredient::get_for_recipe(&conn, recipe.id).unwrap().len(), 2);
        // Name table deduplicates case-insensitively
        assert_eq!(Ingredient::list_names(&conn).unwrap(), vec!["egg".to_string()]);
    }

    #[test]
    fn test_cascade_delete_with_recipe() {
        let db = test_db("ingredient_cascade");
        let conn = db.get_conn().unwrap();
        let recipe = make_recipe(&conn);

        Ingredient::create(
            &conn,
            recipe.id,
            &IngredientCreate {
                name: "butter".to_string(),
                quantity: 10.0,
                unit: "g".to_string(),
            },
        )
        .unwrap();

        assert!(Recipe::delete(&conn, recipe.id).unwrap());
        assert!(Ingredient::get_for_recipe(&conn, recipe.id).unwrap().is_empty());
    }

    #[test]
    fn test_per_ingredient_nutrition() {
        let db = test_db("ingredient_nutrition");
        let conn = db.get_conn().unwrap();
        let recipe = make_recipe(&conn);

        let item = Ingredient::create(
            &conn,
            recipe.id,
            &IngredientCreate {
                name: "cheese".to_string(),
                quantity: 30.0,
                unit: "g".to_string(),
            },
        )
        .unwrap();
        assert!(item.nutrition.is_none());

        let n = NutritionalInfo { calories: 120.0, fat: 10.0, ..NutritionalInfo::zero() };
        Ingredient::update_nutrition(&conn, item.id, Some(&n)).unwrap();

        let fetched = Ingredient::get_by_id(&conn, item.id).unwrap().unwrap();
        assert_eq!(fetched.nutrition, Some(n));
    }
}
