// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides store construction and recipe/ingredient/line seeding helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems
#![allow(dead_code)]

//! Shared test utilities for `levain_core`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use levain_core::database::RecipeStore;
use levain_core::models::{
    Ingredient, IngredientLine, LineTarget, MeasureUnit, NewIngredientLine, Recipe,
};
use std::sync::Once;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test store setup against an in-memory database
pub async fn create_test_store() -> Result<RecipeStore> {
    init_test_logging();
    let store = RecipeStore::connect("sqlite::memory:").await?;
    store.migrate().await?;
    Ok(store)
}

/// Create and persist a recipe
pub async fn seed_recipe(
    store: &RecipeStore,
    user_id: Uuid,
    name: &str,
    servings: u32,
) -> Result<Recipe> {
    let recipe = Recipe::new(user_id, name, servings);
    store.create_recipe(&recipe).await?;
    Ok(recipe)
}

/// Create and persist a priced ingredient
pub async fn seed_ingredient(
    store: &RecipeStore,
    user_id: Uuid,
    name: &str,
    price: f64,
    price_unit: MeasureUnit,
) -> Result<Ingredient> {
    let ingredient = Ingredient::new(user_id, name, price, price_unit);
    store.create_ingredient(&ingredient).await?;
    Ok(ingredient)
}

/// Add a priced-ingredient line directly at the store level
pub async fn add_priced_line(
    store: &RecipeStore,
    recipe_id: Uuid,
    ingredient_id: Uuid,
    quantity: f64,
    unit: MeasureUnit,
    loss_percent: f64,
) -> Result<IngredientLine> {
    let line = store
        .create_line(
            recipe_id,
            &NewIngredientLine {
                target: LineTarget::Ingredient { ingredient_id },
                quantity,
                unit,
                loss_percent,
            },
        )
        .await?;
    Ok(line)
}

/// Add a sub-recipe edge directly at the store level, bypassing the guard
///
/// Graph tests build arbitrary topologies (including deliberately corrupt
/// cyclic ones) with this helper; the service path is exercised separately.
pub async fn link_sub_recipe(
    store: &RecipeStore,
    recipe_id: Uuid,
    sub_recipe_id: Uuid,
    loss_percent: f64,
) -> Result<IngredientLine> {
    let line = store
        .create_line(
            recipe_id,
            &NewIngredientLine {
                target: LineTarget::SubRecipe { sub_recipe_id },
                quantity: 1.0,
                unit: MeasureUnit::Unit,
                loss_percent,
            },
        )
        .await?;
    Ok(line)
}
