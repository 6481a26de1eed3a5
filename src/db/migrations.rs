//! Database migrations
//!
//! Schema creation and migration logic for the recipe catalog.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- RECIPES
        -- Nutrition columns are NULL until computed by the
        -- on-demand endpoint or the backfill job.
        -- ============================================
        CREATE TABLE recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            category TEXT NOT NULL,
            region TEXT NOT NULL,
            portions INTEGER NOT NULL DEFAULT 1 CHECK(portions >= 1),
            description TEXT NOT NULL DEFAULT '',
            image_url TEXT,

            -- Aggregate nutrition for the whole recipe
            calories REAL,
            protein REAL,                        -- grams
            fat REAL,                            -- grams
            carbohydrates REAL,                  -- grams
            fiber REAL,                          -- grams
            sugar REAL,                          -- grams
            sodium REAL,                         -- milligrams
            cholesterol REAL,                    -- milligrams

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipes_title ON recipes(title);
        CREATE INDEX idx_recipes_category ON recipes(category);
        CREATE INDEX idx_recipes_region ON recipes(region);

        -- ============================================
        -- INGREDIENTS
        -- Scoped to one recipe; nutrition columns hold the
        -- per-ingredient lookup result when available.
        -- ============================================
        CREATE TABLE ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            quantity REAL NOT NULL CHECK(quantity >= 0),
            unit TEXT NOT NULL,

            calories REAL,
            protein REAL,
            fat REAL,
            carbohydrates REAL,
            fiber REAL,
            sugar REAL,
            sodium REAL,
            cholesterol REAL,

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_ingredients_recipe ON ingredients(recipe_id);
        CREATE INDEX idx_ingredients_name ON ingredients(name);

        -- ============================================
        -- INGREDIENT NAMES
        -- Deduplicated lookup table backing search filters.
        -- ============================================
        CREATE TABLE ingredient_names (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        -- ============================================
        -- STEPS
        -- Ordered per recipe; step_order is 1-based and
        -- assigned at insertion time.
        -- ============================================
        CREATE TABLE steps (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            step_order INTEGER NOT NULL,
            description TEXT NOT NULL,

            UNIQUE(recipe_id, step_order)
        );

        CREATE INDEX idx_steps_recipe ON steps(recipe_id);

        -- ============================================
        -- FAVORITES
        -- Join of a user to a recipe. The application runs
        -- with a single fixed user id.
        -- ============================================
        CREATE TABLE favorites (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(user_id, recipe_id)
        );

        CREATE INDEX idx_favorites_recipe ON favorites(recipe_id);

        -- ============================================
        -- AI RECIPES
        -- Generated recipes kept as JSON alongside the title
        -- extracted for listing.
        -- ============================================
        CREATE TABLE ai_recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            body TEXT NOT NULL,                  -- JSON document from the model
            image_url TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
