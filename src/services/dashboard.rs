// ABOUTME: Dashboard statistics aggregation over a user's recipe portfolio
// ABOUTME: Prices every recipe a user owns and ranks the results by margin
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

use crate::costing::pricing::{calculate_pricing, RecipePricing};
use crate::database::RecipeStore;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recipe's pricing figures in the dashboard overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeMarginEntry {
    /// Recipe identifier
    pub recipe_id: Uuid,
    /// Recipe name
    pub name: String,
    /// Computed pricing figures
    pub pricing: RecipePricing,
}

/// Price every recipe owned by `user_id` and rank by margin
///
/// Results are sorted by margin percent descending, with suggested price as
/// the tiebreaker (recipes priced with the same coefficient share a margin,
/// so the tiebreaker keeps the ordering meaningful). Recipes with no costed
/// lines end up last with zero margin.
///
/// # Errors
///
/// Returns an error if any recipe fails to price (missing referenced
/// entities, depth limit) or a database read fails.
pub async fn pricing_overview(
    store: &RecipeStore,
    user_id: Uuid,
    margin_coefficient: Option<f64>,
) -> AppResult<Vec<RecipeMarginEntry>> {
    let recipes = store.recipes_for_user(user_id).await?;

    let mut entries = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let pricing = calculate_pricing(store, recipe.id, margin_coefficient).await?;
        entries.push(RecipeMarginEntry {
            recipe_id: recipe.id,
            name: recipe.name,
            pricing,
        });
    }

    entries.sort_by(|a, b| {
        b.pricing
            .margin_percent
            .total_cmp(&a.pricing.margin_percent)
            .then_with(|| {
                b.pricing
                    .suggested_price
                    .total_cmp(&a.pricing.suggested_price)
            })
    });

    Ok(entries)
}
