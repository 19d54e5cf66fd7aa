// ABOUTME: Demo data seeder for the Levain costing core
// ABOUTME: Populates a bakery catalog with ingredients, sub-recipes, and priced recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

//! Demo data seeder for Levain.
//!
//! Populates the database with a small bakery: priced ingredients, a
//! pre-ferment sub-recipe, and finished recipes, then prints the computed
//! pricing of each.
//!
//! Usage:
//! ```bash
//! # Seed the default database file
//! cargo run --bin seed-demo-data
//!
//! # Seed a specific database, resetting it first
//! cargo run --bin seed-demo-data -- --database-url sqlite:levain.db --reset
//! ```

use anyhow::Result;
use clap::Parser;
use levain_core::costing::pricing::calculate_pricing;
use levain_core::database::RecipeStore;
use levain_core::logging::{init_logging, LoggingConfig};
use levain_core::models::{Ingredient, LineTarget, MeasureUnit, NewIngredientLine, Recipe};
use levain_core::services::dashboard::pricing_overview;
use levain_core::services::recipes::add_ingredient_line;
use tracing::info;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "seed-demo-data",
    about = "Levain Demo Data Seeder",
    long_about = "Populate the database with a demo bakery for dashboard and pricing testing"
)]
struct SeedArgs {
    /// Database URL to seed
    #[arg(long, default_value = "sqlite:levain_demo.db")]
    database_url: String,

    /// Delete all existing rows before seeding
    #[arg(long)]
    reset: bool,
}

struct DemoLine {
    target: LineTarget,
    quantity: f64,
    unit: MeasureUnit,
    loss_percent: f64,
}

async fn seed_lines(store: &RecipeStore, recipe_id: Uuid, lines: Vec<DemoLine>) -> Result<()> {
    for line in lines {
        add_ingredient_line(
            store,
            recipe_id,
            &NewIngredientLine {
                target: line.target,
                quantity: line.quantity,
                unit: line.unit,
                loss_percent: line.loss_percent,
            },
        )
        .await?;
    }
    Ok(())
}

// Long function: seeds the whole demo catalog in one readable pass
async fn seed(store: &RecipeStore, user_id: Uuid) -> Result<()> {
    let flour = Ingredient::new(user_id, "T65 flour", 1.20, MeasureUnit::Kilograms);
    let butter = Ingredient::new(user_id, "AOP butter", 9.80, MeasureUnit::Kilograms);
    let sugar = Ingredient::new(user_id, "Caster sugar", 1.05, MeasureUnit::Kilograms);
    let salt = Ingredient::new(user_id, "Sea salt", 2.40, MeasureUnit::Kilograms);
    let yeast = Ingredient::new(user_id, "Fresh yeast", 4.50, MeasureUnit::Kilograms);
    let egg = Ingredient::new(user_id, "Free-range egg", 0.35, MeasureUnit::Unit);
    let milk = Ingredient::new(user_id, "Whole milk", 1.10, MeasureUnit::Liters);

    for ingredient in [&flour, &butter, &sugar, &salt, &yeast, &egg, &milk] {
        store.create_ingredient(ingredient).await?;
    }
    info!("Seeded 7 priced ingredients");

    // Pre-ferment used by both finished recipes
    let poolish = Recipe::new(user_id, "Poolish", 0)
        .with_description("Overnight pre-ferment, used as a sub-recipe");
    store.create_recipe(&poolish).await?;
    seed_lines(
        store,
        poolish.id,
        vec![
            DemoLine {
                target: LineTarget::Ingredient {
                    ingredient_id: flour.id,
                },
                quantity: 500.0,
                unit: MeasureUnit::Grams,
                loss_percent: 0.0,
            },
            DemoLine {
                target: LineTarget::Ingredient {
                    ingredient_id: yeast.id,
                },
                quantity: 5.0,
                unit: MeasureUnit::Grams,
                loss_percent: 0.0,
            },
        ],
    )
    .await?;

    let baguette = Recipe::new(user_id, "Baguette tradition", 20)
        .with_description("Classic lean dough built on the poolish");
    store.create_recipe(&baguette).await?;
    seed_lines(
        store,
        baguette.id,
        vec![
            DemoLine {
                target: LineTarget::SubRecipe {
                    sub_recipe_id: poolish.id,
                },
                quantity: 1.0,
                unit: MeasureUnit::Unit,
                loss_percent: 0.0,
            },
            DemoLine {
                target: LineTarget::Ingredient {
                    ingredient_id: flour.id,
                },
                quantity: 1.5,
                unit: MeasureUnit::Kilograms,
                loss_percent: 2.0,
            },
            DemoLine {
                target: LineTarget::Ingredient {
                    ingredient_id: salt.id,
                },
                quantity: 36.0,
                unit: MeasureUnit::Grams,
                loss_percent: 0.0,
            },
        ],
    )
    .await?;

    let brioche = Recipe::new(user_id, "Brioche Nanterre", 12)
        .with_description("Enriched dough, high butter ratio");
    store.create_recipe(&brioche).await?;
    seed_lines(
        store,
        brioche.id,
        vec![
            DemoLine {
                target: LineTarget::SubRecipe {
                    sub_recipe_id: poolish.id,
                },
                quantity: 1.0,
                unit: MeasureUnit::Unit,
                loss_percent: 5.0,
            },
            DemoLine {
                target: LineTarget::Ingredient {
                    ingredient_id: butter.id,
                },
                quantity: 400.0,
                unit: MeasureUnit::Grams,
                loss_percent: 3.0,
            },
            DemoLine {
                target: LineTarget::Ingredient {
                    ingredient_id: sugar.id,
                },
                quantity: 120.0,
                unit: MeasureUnit::Grams,
                loss_percent: 0.0,
            },
            DemoLine {
                target: LineTarget::Ingredient {
                    ingredient_id: egg.id,
                },
                quantity: 6.0,
                unit: MeasureUnit::Unit,
                loss_percent: 0.0,
            },
            DemoLine {
                target: LineTarget::Ingredient {
                    ingredient_id: milk.id,
                },
                quantity: 150.0,
                unit: MeasureUnit::Milliliters,
                loss_percent: 0.0,
            },
        ],
    )
    .await?;
    info!("Seeded 3 recipes (1 pre-ferment, 2 finished)");

    for recipe in [&poolish, &baguette, &brioche] {
        let pricing = calculate_pricing(store, recipe.id, None).await?;
        info!(
            name = %recipe.name,
            total_cost = pricing.total_cost,
            cost_per_serving = pricing.cost_per_serving,
            suggested_price = pricing.suggested_price,
            margin_percent = pricing.margin_percent,
            "Priced recipe"
        );
    }

    let overview = pricing_overview(store, user_id, None).await?;
    for (rank, entry) in overview.iter().enumerate() {
        info!(
            rank = rank + 1,
            name = %entry.name,
            margin_percent = entry.pricing.margin_percent,
            "Dashboard ranking"
        );
    }

    Ok(())
}

async fn reset(store: &RecipeStore, pool_url: &str) -> Result<()> {
    info!(database_url = pool_url, "Resetting existing data");
    // Lines first: the FK from lines to recipes is NOT NULL
    for table in ["recipe_ingredients", "ingredients", "recipes"] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(store.pool())
            .await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();
    init_logging(&LoggingConfig::from_env())?;

    let store = RecipeStore::connect(&args.database_url).await?;
    store.migrate().await?;

    if args.reset {
        reset(&store, &args.database_url).await?;
    }

    let user_id = Uuid::new_v4();
    info!(user_id = %user_id, "Seeding demo bakery");
    seed(&store, user_id).await?;
    info!("Demo data seeded");

    Ok(())
}
