// ABOUTME: Ingredient line lifecycle with write-time cycle prevention
// ABOUTME: Validates input, enforces ownership, and gates sub-recipe edges on the cycle guard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

use crate::costing::graph::can_add_sub_recipe;
use crate::database::RecipeStore;
use crate::errors::{AppError, AppResult};
use crate::models::{IngredientLine, IngredientLineUpdate, LineTarget, NewIngredientLine};
use tracing::info;
use uuid::Uuid;

fn validate_quantity(quantity: f64) -> AppResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(AppError::invalid_input(format!(
            "Quantity must be a positive number, got {quantity}"
        )));
    }
    Ok(())
}

fn validate_loss_percent(loss_percent: f64) -> AppResult<()> {
    if !loss_percent.is_finite() || !(0.0..=100.0).contains(&loss_percent) {
        return Err(AppError::value_out_of_range(format!(
            "Loss percent must be between 0 and 100, got {loss_percent}"
        )));
    }
    Ok(())
}

/// Add an ingredient line to a recipe
///
/// Validates quantity and loss bounds, verifies the recipe and the
/// referenced entity exist, enforces that sub-recipes belong to the same
/// user, and consults the cycle guard before persisting a sub-recipe edge.
/// A `false` verdict rejects the write with a client-class error; nothing
/// is persisted and the pricing engine is never invoked.
///
/// # Errors
///
/// Returns not-found for a missing recipe or referenced entity, an
/// invalid-input error for bad quantities, cross-user sub-recipes, or
/// edges that would create a cycle, and database errors as-is.
pub async fn add_ingredient_line(
    store: &RecipeStore,
    recipe_id: Uuid,
    new_line: &NewIngredientLine,
) -> AppResult<IngredientLine> {
    validate_quantity(new_line.quantity)?;
    validate_loss_percent(new_line.loss_percent)?;

    let recipe = store
        .recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;

    match new_line.target {
        LineTarget::Ingredient { ingredient_id } => {
            store
                .ingredient(ingredient_id)
                .await?
                .ok_or_else(|| AppError::not_found("Ingredient"))?;
        }
        // Reference-database foods live outside our store; the external ID
        // is taken at face value here and validated by the labeling layer.
        LineTarget::ReferenceFood { .. } => {}
        LineTarget::SubRecipe { sub_recipe_id } => {
            let sub_recipe = store
                .recipe(sub_recipe_id)
                .await?
                .ok_or_else(|| AppError::not_found("Sub-recipe"))?;

            if sub_recipe.user_id != recipe.user_id {
                return Err(AppError::invalid_input(
                    "Sub-recipes must belong to the same user as the recipe",
                ));
            }

            if !can_add_sub_recipe(store, recipe_id, sub_recipe_id).await? {
                return Err(AppError::invalid_input(
                    "Adding this sub-recipe would create a cycle in the recipe graph",
                ));
            }
        }
    }

    let line = store.create_line(recipe_id, new_line).await?;
    info!(
        recipe_id = %recipe_id,
        line_id = %line.id,
        "Added ingredient line"
    );
    Ok(line)
}

/// Update an ingredient line's quantity, unit, or loss
///
/// The referenced entity cannot change; re-targeting is delete + create so
/// every new edge passes through the cycle guard.
///
/// # Errors
///
/// Returns not-found for a missing line, validation errors for bad values,
/// and database errors as-is.
pub async fn update_ingredient_line(
    store: &RecipeStore,
    line_id: Uuid,
    update: &IngredientLineUpdate,
) -> AppResult<IngredientLine> {
    if let Some(quantity) = update.quantity {
        validate_quantity(quantity)?;
    }
    if let Some(loss_percent) = update.loss_percent {
        validate_loss_percent(loss_percent)?;
    }

    store.update_line(line_id, update).await
}

/// Remove an ingredient line from its recipe
///
/// The referenced ingredient or sub-recipe is never deleted with the line.
///
/// # Errors
///
/// Returns not-found for a missing line and database errors as-is.
pub async fn remove_ingredient_line(store: &RecipeStore, line_id: Uuid) -> AppResult<()> {
    store.delete_line(line_id).await
}
