// ABOUTME: Database operations for recipes, priced ingredients, and ingredient lines
// ABOUTME: Handles CRUD over the sub-recipe edge table with exactly-one-reference enforcement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

use crate::costing::CostingStore;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Ingredient, IngredientLine, IngredientLineUpdate, LineTarget, MeasureUnit, NewIngredientLine,
    Recipe,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

/// Schema statements, executed in order and idempotent
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS recipes (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        servings INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_recipes_user ON recipes(user_id)",
    r"
    CREATE TABLE IF NOT EXISTS ingredients (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        price REAL NOT NULL,
        price_unit TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_ingredients_user ON ingredients(user_id)",
    // Exactly one of ingredient_id / reference_food_id / sub_recipe_id may
    // be set; the CHECK mirrors the LineTarget enum at the storage level.
    r"
    CREATE TABLE IF NOT EXISTS recipe_ingredients (
        id TEXT PRIMARY KEY,
        recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        ingredient_id TEXT REFERENCES ingredients(id),
        reference_food_id INTEGER,
        sub_recipe_id TEXT REFERENCES recipes(id),
        quantity REAL NOT NULL,
        unit TEXT NOT NULL,
        loss_percent REAL NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        CHECK (
            (ingredient_id IS NOT NULL)
            + (reference_food_id IS NOT NULL)
            + (sub_recipe_id IS NOT NULL) = 1
        )
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_sub ON recipe_ingredients(sub_recipe_id)",
];

/// SQLite-backed store for the recipe graph
#[derive(Debug, Clone)]
pub struct RecipeStore {
    pool: SqlitePool,
}

impl RecipeStore {
    /// Connect to the database at `url`, creating the file if missing
    ///
    /// Foreign keys are enabled so deleting a recipe cascades to its lines.
    /// In-memory URLs are capped at one connection because each SQLite
    /// memory connection is its own database.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid URL or a database error
    /// if the pool cannot be established.
    pub async fn connect(url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        let max_connections = if url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect: {e}")))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool (seeders and migration tooling)
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the schema if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if any schema statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        Ok(())
    }

    // ========================================================================
    // Recipes
    // ========================================================================

    /// Insert a new recipe
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create_recipe(&self, recipe: &Recipe) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO recipes (id, user_id, name, description, servings, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(recipe.id.to_string())
        .bind(recipe.user_id.to_string())
        .bind(&recipe.name)
        .bind(&recipe.description)
        .bind(i64::from(recipe.servings))
        .bind(recipe.created_at.to_rfc3339())
        .bind(recipe.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;

        Ok(())
    }

    /// Fetch a recipe by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn recipe(&self, id: Uuid) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, name, description, servings, created_at, updated_at
            FROM recipes
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    /// List all recipes owned by a user, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn recipes_for_user(&self, user_id: Uuid) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, name, description, servings, created_at, updated_at
            FROM recipes
            WHERE user_id = $1
            ORDER BY name ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Update a recipe's name, description, and servings
    ///
    /// # Errors
    ///
    /// Returns not-found if the recipe does not exist, or a database error
    pub async fn update_recipe(&self, recipe: &Recipe) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE recipes
            SET name = $1, description = $2, servings = $3, updated_at = $4
            WHERE id = $5
            ",
        )
        .bind(&recipe.name)
        .bind(&recipe.description)
        .bind(i64::from(recipe.servings))
        .bind(Utc::now().to_rfc3339())
        .bind(recipe.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Recipe"));
        }
        Ok(())
    }

    /// Delete a recipe; its ingredient lines cascade
    ///
    /// # Errors
    ///
    /// Returns not-found if the recipe does not exist, or a database error
    pub async fn delete_recipe(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Recipe"));
        }
        Ok(())
    }

    // ========================================================================
    // Ingredients
    // ========================================================================

    /// Insert a new priced ingredient
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create_ingredient(&self, ingredient: &Ingredient) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO ingredients (id, user_id, name, price, price_unit, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(ingredient.id.to_string())
        .bind(ingredient.user_id.to_string())
        .bind(&ingredient.name)
        .bind(ingredient.price)
        .bind(ingredient.price_unit.as_str())
        .bind(ingredient.created_at.to_rfc3339())
        .bind(ingredient.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create ingredient: {e}")))?;

        Ok(())
    }

    /// Fetch a priced ingredient by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn ingredient(&self, id: Uuid) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, name, price, price_unit, created_at, updated_at
            FROM ingredients
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

        row.map(|r| row_to_ingredient(&r)).transpose()
    }

    /// List all priced ingredients owned by a user, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn ingredients_for_user(&self, user_id: Uuid) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, name, price, price_unit, created_at, updated_at
            FROM ingredients
            WHERE user_id = $1
            ORDER BY name ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        rows.iter().map(row_to_ingredient).collect()
    }

    /// Delete a priced ingredient
    ///
    /// # Errors
    ///
    /// Returns not-found if the ingredient does not exist, or a database error
    pub async fn delete_ingredient(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete ingredient: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Ingredient"));
        }
        Ok(())
    }

    // ========================================================================
    // Ingredient lines
    // ========================================================================

    /// Insert a new ingredient line for a recipe
    ///
    /// Persists the edge as written; cycle safety is the caller's job (the
    /// service layer consults the cycle guard before calling this).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create_line(
        &self,
        recipe_id: Uuid,
        new_line: &NewIngredientLine,
    ) -> AppResult<IngredientLine> {
        let now = Utc::now();
        let line = IngredientLine {
            id: Uuid::new_v4(),
            recipe_id,
            target: new_line.target,
            quantity: new_line.quantity,
            unit: new_line.unit,
            loss_percent: new_line.loss_percent,
            created_at: now,
            updated_at: now,
        };

        let (ingredient_id, reference_food_id, sub_recipe_id) = match line.target {
            LineTarget::Ingredient { ingredient_id } => (Some(ingredient_id.to_string()), None, None),
            LineTarget::ReferenceFood { reference_food_id } => (None, Some(reference_food_id), None),
            LineTarget::SubRecipe { sub_recipe_id } => (None, None, Some(sub_recipe_id.to_string())),
        };

        sqlx::query(
            r"
            INSERT INTO recipe_ingredients
                (id, recipe_id, ingredient_id, reference_food_id, sub_recipe_id,
                 quantity, unit, loss_percent, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(line.id.to_string())
        .bind(line.recipe_id.to_string())
        .bind(ingredient_id)
        .bind(reference_food_id)
        .bind(sub_recipe_id)
        .bind(line.quantity)
        .bind(line.unit.as_str())
        .bind(line.loss_percent)
        .bind(line.created_at.to_rfc3339())
        .bind(line.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create ingredient line: {e}")))?;

        Ok(line)
    }

    /// Fetch an ingredient line by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn line(&self, id: Uuid) -> AppResult<Option<IngredientLine>> {
        let row = sqlx::query(
            r"
            SELECT id, recipe_id, ingredient_id, reference_food_id, sub_recipe_id,
                   quantity, unit, loss_percent, created_at, updated_at
            FROM recipe_ingredients
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get ingredient line: {e}")))?;

        row.map(|r| row_to_line(&r)).transpose()
    }

    /// Fetch all ingredient lines of a recipe, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn lines_for_recipe(&self, recipe_id: Uuid) -> AppResult<Vec<IngredientLine>> {
        let rows = sqlx::query(
            r"
            SELECT id, recipe_id, ingredient_id, reference_food_id, sub_recipe_id,
                   quantity, unit, loss_percent, created_at, updated_at
            FROM recipe_ingredients
            WHERE recipe_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(recipe_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ingredient lines: {e}")))?;

        rows.iter().map(row_to_line).collect()
    }

    /// Apply a partial update to a line's quantity, unit, or loss
    ///
    /// # Errors
    ///
    /// Returns not-found if the line does not exist, or a database error
    pub async fn update_line(
        &self,
        id: Uuid,
        update: &IngredientLineUpdate,
    ) -> AppResult<IngredientLine> {
        let mut line = self
            .line(id)
            .await?
            .ok_or_else(|| AppError::not_found("Ingredient line"))?;

        if let Some(quantity) = update.quantity {
            line.quantity = quantity;
        }
        if let Some(unit) = update.unit {
            line.unit = unit;
        }
        if let Some(loss_percent) = update.loss_percent {
            line.loss_percent = loss_percent;
        }
        line.updated_at = Utc::now();

        sqlx::query(
            r"
            UPDATE recipe_ingredients
            SET quantity = $1, unit = $2, loss_percent = $3, updated_at = $4
            WHERE id = $5
            ",
        )
        .bind(line.quantity)
        .bind(line.unit.as_str())
        .bind(line.loss_percent)
        .bind(line.updated_at.to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update ingredient line: {e}")))?;

        Ok(line)
    }

    /// Delete an ingredient line; never touches the referenced entity
    ///
    /// # Errors
    ///
    /// Returns not-found if the line does not exist, or a database error
    pub async fn delete_line(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM recipe_ingredients WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete ingredient line: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Ingredient line"));
        }
        Ok(())
    }

    /// Fetch the sub-recipe IDs directly referenced by a recipe
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn sub_recipe_ids(&self, recipe_id: Uuid) -> AppResult<Vec<Uuid>> {
        let rows = sqlx::query(
            r"
            SELECT sub_recipe_id
            FROM recipe_ingredients
            WHERE recipe_id = $1 AND sub_recipe_id IS NOT NULL
            ",
        )
        .bind(recipe_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list sub-recipe edges: {e}")))?;

        rows.iter()
            .map(|row| {
                let raw: String = row.get("sub_recipe_id");
                parse_uuid(&raw, "sub_recipe_id")
            })
            .collect()
    }
}

#[async_trait]
impl CostingStore for RecipeStore {
    async fn recipe(&self, id: Uuid) -> AppResult<Option<Recipe>> {
        Self::recipe(self, id).await
    }

    async fn ingredient(&self, id: Uuid) -> AppResult<Option<Ingredient>> {
        Self::ingredient(self, id).await
    }

    async fn ingredient_lines(&self, recipe_id: Uuid) -> AppResult<Vec<IngredientLine>> {
        self.lines_for_recipe(recipe_id).await
    }

    async fn sub_recipe_ids(&self, recipe_id: Uuid) -> AppResult<Vec<Uuid>> {
        Self::sub_recipe_ids(self, recipe_id).await
    }
}

// ============================================================================
// Row conversion
// ============================================================================

fn parse_uuid(raw: &str, field: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| AppError::database(format!("Invalid {field}: {e}")))
}

fn parse_timestamp(raw: &str, field: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid {field}: {e}")))
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let servings: i64 = row.get("servings");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Recipe {
        id: parse_uuid(&id, "recipe id")?,
        user_id: parse_uuid(&user_id, "user id")?,
        name: row.get("name"),
        description: row.get("description"),
        servings: u32::try_from(servings).unwrap_or(0),
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}

fn row_to_ingredient(row: &SqliteRow) -> AppResult<Ingredient> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let price_unit: String = row.get("price_unit");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Ingredient {
        id: parse_uuid(&id, "ingredient id")?,
        user_id: parse_uuid(&user_id, "user id")?,
        name: row.get("name"),
        price: row.get("price"),
        price_unit: MeasureUnit::parse(&price_unit),
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}

fn row_to_line(row: &SqliteRow) -> AppResult<IngredientLine> {
    let id: String = row.get("id");
    let recipe_id: String = row.get("recipe_id");
    let ingredient_id: Option<String> = row.get("ingredient_id");
    let reference_food_id: Option<i64> = row.get("reference_food_id");
    let sub_recipe_id: Option<String> = row.get("sub_recipe_id");
    let unit: String = row.get("unit");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    let target = match (ingredient_id, reference_food_id, sub_recipe_id) {
        (Some(raw), None, None) => LineTarget::Ingredient {
            ingredient_id: parse_uuid(&raw, "ingredient_id")?,
        },
        (None, Some(reference_food_id), None) => LineTarget::ReferenceFood { reference_food_id },
        (None, None, Some(raw)) => LineTarget::SubRecipe {
            sub_recipe_id: parse_uuid(&raw, "sub_recipe_id")?,
        },
        _ => {
            return Err(AppError::database(format!(
                "Ingredient line {id} violates the exactly-one-reference invariant"
            )))
        }
    };

    Ok(IngredientLine {
        id: parse_uuid(&id, "line id")?,
        recipe_id: parse_uuid(&recipe_id, "recipe id")?,
        target,
        quantity: row.get("quantity"),
        unit: MeasureUnit::parse(&unit),
        loss_percent: row.get("loss_percent"),
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}
