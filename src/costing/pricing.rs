// ABOUTME: Recursive pricing engine for recipes with nested sub-recipes
// ABOUTME: Computes total cost, cost per serving, suggested price, and margin percent
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

//! Read-time cost computation.
//!
//! [`calculate_pricing`] folds priced-ingredient contributions (with unit
//! conversion and loss adjustment) and recursively computed sub-recipe
//! batch costs into a [`RecipePricing`]. The graph is acyclic by the time
//! pricing runs (the cycle guard enforces that at write time), but the
//! recursion still carries a visited set and short-circuits cycles to a
//! zero result, since data may have been written by another path or be
//! legacy/corrupt.

use crate::config::CostingConfig;
use crate::costing::conversion::convert_quantity;
use crate::costing::{CostingStore, TraversalError};
use crate::errors::{AppError, AppResult};
use crate::models::LineTarget;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;
use uuid::Uuid;

/// Computed pricing figures for one recipe, rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecipePricing {
    /// Total cost of producing the full batch
    pub total_cost: f64,
    /// Total cost divided by servings (zero when servings is zero)
    pub cost_per_serving: f64,
    /// Total cost multiplied by the margin coefficient
    pub suggested_price: f64,
    /// Margin as a percentage of the suggested price
    pub margin_percent: f64,
}

impl RecipePricing {
    /// A zero-valued result
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            total_cost: 0.0,
            cost_per_serving: 0.0,
            suggested_price: 0.0,
            margin_percent: 0.0,
        }
    }
}

/// Compute the pricing of a recipe, recursing into sub-recipes
///
/// `margin_coefficient` defaults to the configured value (3.0) when `None`.
///
/// # Errors
///
/// Returns [`AppError::not_found`] if the recipe (or any referenced
/// ingredient or sub-recipe) does not exist, an invalid-input error for a
/// non-positive margin coefficient, and an internal error if the graph
/// nests deeper than the configured maximum depth.
pub async fn calculate_pricing<S: CostingStore>(
    store: &S,
    recipe_id: Uuid,
    margin_coefficient: Option<f64>,
) -> AppResult<RecipePricing> {
    calculate_pricing_bounded(
        store,
        recipe_id,
        margin_coefficient,
        CostingConfig::global().max_graph_depth,
    )
    .await
}

/// [`calculate_pricing`] with an explicit recursion depth cap
///
/// # Errors
///
/// Same conditions as [`calculate_pricing`].
pub async fn calculate_pricing_bounded<S: CostingStore>(
    store: &S,
    recipe_id: Uuid,
    margin_coefficient: Option<f64>,
    max_depth: usize,
) -> AppResult<RecipePricing> {
    let coefficient =
        margin_coefficient.unwrap_or_else(|| CostingConfig::global().default_margin_coefficient);
    if !coefficient.is_finite() || coefficient <= 0.0 {
        return Err(AppError::invalid_input(format!(
            "Margin coefficient must be a positive number, got {coefficient}"
        )));
    }

    let recipe = store
        .recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;

    // Unrounded accumulation; rounding intermediate sub-recipe costs would
    // compound error, so two-decimal rounding happens once, below.
    let total = batch_cost(store, recipe_id, HashSet::new(), 0, max_depth).await?;

    let cost_per_serving = if recipe.servings > 0 {
        total / f64::from(recipe.servings)
    } else {
        0.0
    };
    let suggested_price = total * coefficient;
    let margin_percent = if suggested_price > 0.0 {
        ((suggested_price - total) / suggested_price) * 100.0
    } else {
        0.0
    };

    Ok(RecipePricing {
        total_cost: round2(total),
        cost_per_serving: round2(cost_per_serving),
        suggested_price: round2(suggested_price),
        margin_percent: round2(margin_percent),
    })
}

/// Unrounded cost of producing the full batch of `recipe_id`
///
/// `visited` is branch-local, mirroring the cycle guard's traversal
/// discipline: each recursive call gets its own copy, so sibling branches
/// never observe each other's state and DAG convergence stays safe.
fn batch_cost<'a, S: CostingStore>(
    store: &'a S,
    recipe_id: Uuid,
    visited: HashSet<Uuid>,
    depth: usize,
    max_depth: usize,
) -> BoxFuture<'a, AppResult<f64>> {
    Box::pin(async move {
        if depth > max_depth {
            return Err(TraversalError::DepthLimitExceeded(max_depth).into());
        }

        // Defensive read-path guard: a cycle here means the data was written
        // outside the cycle guard. Short-circuit to zero instead of
        // recursing forever, and leave a trail for operators.
        if visited.contains(&recipe_id) {
            warn!(
                recipe_id = %recipe_id,
                "Cycle detected in persisted sub-recipe graph, contributing zero cost"
            );
            return Ok(0.0);
        }

        if store.recipe(recipe_id).await?.is_none() {
            return Err(AppError::not_found("Recipe"));
        }

        let mut branch_visited = visited;
        branch_visited.insert(recipe_id);

        let mut total = 0.0;
        for line in store.ingredient_lines(recipe_id).await? {
            let loss_factor = 1.0 + line.loss_percent / 100.0;

            match line.target {
                LineTarget::Ingredient { ingredient_id } => {
                    let ingredient = store
                        .ingredient(ingredient_id)
                        .await?
                        .ok_or_else(|| AppError::not_found("Ingredient"))?;

                    let converted =
                        convert_quantity(line.quantity, line.unit, ingredient.price_unit)
                            .unwrap_or_else(|| {
                                warn!(
                                    line_id = %line.id,
                                    from = line.unit.as_str(),
                                    to = ingredient.price_unit.as_str(),
                                    "No conversion between units, using raw quantity"
                                );
                                line.quantity
                            });

                    total += converted * ingredient.price * loss_factor;
                }
                // Nutrition-database entries carry no price; users cost such
                // items by creating a priced ingredient entry instead.
                LineTarget::ReferenceFood { .. } => {}
                LineTarget::SubRecipe { sub_recipe_id } => {
                    // Full batch cost of the sub-recipe is attributed to this
                    // line as-is; its own servings and suggested price are
                    // ignored. Known limitation, kept deliberately.
                    let sub_cost = batch_cost(
                        store,
                        sub_recipe_id,
                        branch_visited.clone(),
                        depth + 1,
                        max_depth,
                    )
                    .await?;
                    total += sub_cost * loss_factor;
                }
            }
        }

        Ok(total)
    })
}

/// Round to two decimals, half away from zero
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_half_away_from_zero() {
        assert!((round2(0.005) - 0.01).abs() < f64::EPSILON);
        assert!((round2(-0.005) + 0.01).abs() < f64::EPSILON);
        assert!((round2(66.6666) - 66.67).abs() < f64::EPSILON);
        assert!((round2(1.004) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_pricing() {
        let zero = RecipePricing::zero();
        assert!(zero.total_cost.abs() < f64::EPSILON);
        assert!(zero.margin_percent.abs() < f64::EPSILON);
    }
}
