//! Recipe model
//!
//! A catalog entry with optional aggregate nutrition. The nutrition
//! columns stay NULL until the on-demand endpoint or the backfill job
//! fills them in.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::NutritionalInfo;

/// A recipe row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub region: String,
    pub portions: i64,
    pub description: String,
    pub image_url: Option<String>,
    pub nutrition: Option<NutritionalInfo>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub title: String,
    pub category: String,
    pub region: String,
    #[serde(default = "default_portions")]
    pub portions: i64,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
}

fn default_portions() -> i64 {
    1
}

/// Filters for listing recipes
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub query: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub ingredient: Option<String>,
    pub favorites_only: bool,
    pub limit: i64,
    pub offset: i64,
}

impl Recipe {
    /// Create a Recipe from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        // NULL calories marks a recipe whose nutrition has not been computed
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
            title: row.get("title")?,
            category: row.get("category")?,
            region: row.get("region")?,
            portions: row.get("portions")?,
            description: row.get("description")?,
            image_url: row.get("image_url")?,
            nutrition,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new recipe
    pub fn create(conn: &Connection, data: &RecipeCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO recipes (title, category, region, portions, description, image_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                data.title,
                data.category,
                data.region,
                data.portions,
                data.description,
                data.image_url,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound)
    }

    /// Get a recipe by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List recipes matching a filter
    pub fn list(conn: &Connection, filter: &RecipeFilter) -> DbResult<Vec<Self>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref q) = filter.query {
            clauses.push(format!("r.title LIKE ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(format!("%{}%", q)));
        }
        if let Some(ref category) = filter.category {
            clauses.push(format!("r.category = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(category.clone()));
        }
        if let Some(ref region) = filter.region {
            clauses.push(format!("r.region = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(region.clone()));
        }
        if let Some(ref ingredient) = filter.ingredient {
            clauses.push(format!(
                "EXISTS (SELECT 1 FROM ingredients i WHERE i.recipe_id = r.id AND i.name LIKE ?{})",
                params_vec.len() + 1
            ));
            params_vec.push(Box::new(format!("%{}%", ingredient)));
        }
        if filter.favorites_only {
            clauses.push("EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id)".to_string());
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let sql = format!(
            "SELECT r.* FROM recipes r {} ORDER BY r.title ASC LIMIT ?{} OFFSET ?{}",
            where_sql,
            params_vec.len() + 1,
            params_vec.len() + 2
        );
        params_vec.push(Box::new(filter.limit));
        params_vec.push(Box::new(filter.offset));

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();

        let recipes = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(recipes)
    }

    /// Select ids of all recipes whose nutrition has not been computed
    pub fn ids_missing_nutrition(conn: &Connection) -> DbResult<Vec<i64>> {
        let mut stmt =
            conn.prepare("SELECT id FROM recipes WHERE calories IS NULL ORDER BY id")?;

        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    /// Persist the aggregate nutrition for a recipe
    pub fn update_nutrition(
        conn: &Connection,
        id: i64,
        nutrition: &NutritionalInfo,
    ) -> DbResult<()> {
        let rows = conn.execute(
            r#"
            UPDATE recipes SET
                calories = ?1,
                protein = ?2,
                fat = ?3,
                carbohydrates = ?4,
                fiber = ?5,
                sugar = ?6,
                sodium = ?7,
                cholesterol = ?8,
                updated_at = datetime('now')
            WHERE id = ?9
            "#,
            params![
                nutrition.calories,
                nutrition.protein,
                nutrition.fat,
                nutrition.carbohydrates,
                nutrition.fiber,
                nutrition.sugar,
                nutrition.sodium,
                nutrition.cholesterol,
                id,
            ],
        )?;

        if rows == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    /// Count recipes matching a filter (ignoring limit/offset)
    pub fn count(conn: &Connection, filter: &RecipeFilter) -> DbResult<i64> {
        let mut unlimited = filter.clone();
        unlimited.limit = i64::MAX;
        unlimited.offset = 0;
        // Reuses the filter SQL; fine at catalog scale
        Ok(Self::list(conn, &unlimited)?.len() as i64)
    }

    /// Delete a recipe; ingredients, steps, and favorites cascade
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn test_db(name: &str) -> Database {
        let db = Database::open_in_memory(name).unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        db
    }

    fn sample() -> RecipeCreate {
        RecipeCreate {
            title: "Shakshuka".to_string(),
            category: "Breakfast".to_string(),
            region: "Middle East".to_string(),
            portions: 2,
            description: "Eggs poached in tomato sauce".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_create_and_get() {
        let db = test_db("recipe_create");
        let conn = db.get_conn().unwrap();

        let recipe = Recipe::create(&conn, &sample()).unwrap();
        assert_eq!(recipe.title, "Shakshuka");
        assert_eq!(recipe.portions, 2);
        assert!(recipe.nutrition.is_none());

        let fetched = Recipe::get_by_id(&conn, recipe.id).unwrap().unwrap();
        assert_eq!(fetched.title, recipe.title);
    }

    #[test]
    fn test_nutrition_roundtrip() {
        let db = test_db("recipe_nutrition");
        let conn = db.get_conn().unwrap();

        let recipe = Recipe::create(&conn, &sample()).unwrap();
        assert!(Recipe::ids_missing_nutrition(&conn).unwrap().contains(&recipe.id));

        let n = NutritionalInfo {
            calories: 300.0,
            protein: 18.5,
            ..NutritionalInfo::zero()
        };
        Recipe::update_nutrition(&conn, recipe.id, &n).unwrap();

        let fetched = Recipe::get_by_id(&conn, recipe.id).unwrap().unwrap();
        assert_eq!(fetched.nutrition, Some(n));
        assert!(Recipe::ids_missing_nutrition(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_list_filters() {
        let db = test_db("recipe_list");
        let conn = db.get_conn().unwrap();

        Recipe::create(&conn, &sample()).unwrap();
        let mut other = sample();
        other.title = "Pad Thai".to_string();
        other.category = "Dinner".to_string();
        other.region = "Thailand".to_string();
        Recipe::create(&conn, &other).unwrap();

        let all = Recipe::list(
            &conn,
            &RecipeFilter { limit: 50, ..Default::default() },
        )
        .unwrap();
        assert_eq!(all.len(), 2);

        let thai = Recipe::list(
            &conn,
            &RecipeFilter {
                region: Some("Thailand".to_string()),
                limit: 50,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(thai.len(), 1);
        assert_eq!(thai[0].title, "Pad Thai");

        let search = Recipe::list(
            &conn,
            &RecipeFilter {
                query: Some("shak".to_string()),
                limit: 50,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(search.len(), 1);
    }
}
