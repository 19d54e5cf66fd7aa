// ABOUTME: Criterion benchmarks for the costing engines
// ABOUTME: Measures pricing recursion and cycle-guard traversal over seeded graphs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

//! Criterion benchmarks for the costing engines.
//!
//! Measures recursive pricing over deep sub-recipe chains and wide fan-out
//! recipes, plus cycle-guard traversal cost.

#![allow(missing_docs, clippy::unwrap_used, clippy::missing_docs_in_private_items)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use levain_core::costing::graph::can_add_sub_recipe;
use levain_core::costing::pricing::calculate_pricing;
use levain_core::database::RecipeStore;
use levain_core::models::{Ingredient, LineTarget, MeasureUnit, NewIngredientLine, Recipe};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Chain depths exercised by the deep-nesting benchmarks
const CHAIN_DEPTHS: [usize; 3] = [2, 8, 32];
/// Line count for the wide fan-out benchmark
const FAN_OUT_LINES: usize = 50;

struct BenchGraph {
    store: RecipeStore,
    chain_tops: Vec<(usize, Uuid)>,
    chain_bottom: Uuid,
    fan_out: Uuid,
    fresh: Uuid,
}

async fn seed_graph() -> BenchGraph {
    let store = RecipeStore::connect("sqlite::memory:").await.unwrap();
    store.migrate().await.unwrap();

    let user = Uuid::new_v4();
    let flour = Ingredient::new(user, "Flour", 2.0, MeasureUnit::Kilograms);
    store.create_ingredient(&flour).await.unwrap();

    let flour_line = NewIngredientLine {
        target: LineTarget::Ingredient {
            ingredient_id: flour.id,
        },
        quantity: 250.0,
        unit: MeasureUnit::Grams,
        loss_percent: 2.0,
    };

    // One chain per depth: top -> ... -> bottom, one priced line per level
    let mut chain_tops = Vec::new();
    let mut chain_bottom = Uuid::new_v4();
    for depth in CHAIN_DEPTHS {
        let mut below: Option<Uuid> = None;
        for level in 0..depth {
            let recipe = Recipe::new(user, format!("chain-{depth}-{level}"), 4);
            store.create_recipe(&recipe).await.unwrap();
            store.create_line(recipe.id, &flour_line).await.unwrap();
            if let Some(child) = below {
                store
                    .create_line(
                        recipe.id,
                        &NewIngredientLine {
                            target: LineTarget::SubRecipe {
                                sub_recipe_id: child,
                            },
                            quantity: 1.0,
                            unit: MeasureUnit::Unit,
                            loss_percent: 0.0,
                        },
                    )
                    .await
                    .unwrap();
            } else {
                chain_bottom = recipe.id;
            }
            below = Some(recipe.id);
        }
        chain_tops.push((depth, below.unwrap()));
    }

    let fan_out = Recipe::new(user, "fan-out", 12);
    store.create_recipe(&fan_out).await.unwrap();
    for _ in 0..FAN_OUT_LINES {
        store.create_line(fan_out.id, &flour_line).await.unwrap();
    }

    let fresh = Recipe::new(user, "fresh", 1);
    store.create_recipe(&fresh).await.unwrap();

    BenchGraph {
        store,
        chain_tops,
        chain_bottom,
        fan_out: fan_out.id,
        fresh: fresh.id,
    }
}

fn bench_pricing_chains(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let graph = rt.block_on(seed_graph());

    let mut group = c.benchmark_group("pricing_chain");
    for (depth, top) in &graph.chain_tops {
        group.bench_with_input(BenchmarkId::from_parameter(depth), top, |b, top| {
            b.to_async(&rt).iter(|| async {
                calculate_pricing(&graph.store, black_box(*top), None)
                    .await
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_pricing_fan_out(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let graph = rt.block_on(seed_graph());

    c.bench_function("pricing_fan_out_50_lines", |b| {
        b.to_async(&rt).iter(|| async {
            calculate_pricing(&graph.store, black_box(graph.fan_out), None)
                .await
                .unwrap()
        });
    });
}

fn bench_cycle_guard(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let graph = rt.block_on(seed_graph());
    let (_, deepest_top) = *graph.chain_tops.last().unwrap();

    // Worst case for the guard: the candidate's dependency chain must be
    // walked to the bottom before the verdict comes back true.
    c.bench_function("cycle_guard_deep_chain", |b| {
        b.to_async(&rt).iter(|| async {
            can_add_sub_recipe(&graph.store, black_box(graph.fresh), black_box(deepest_top))
                .await
                .unwrap()
        });
    });

    c.bench_function("cycle_guard_rejection", |b| {
        b.to_async(&rt).iter(|| async {
            can_add_sub_recipe(
                &graph.store,
                black_box(graph.chain_bottom),
                black_box(deepest_top),
            )
            .await
            .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_pricing_chains,
    bench_pricing_fan_out,
    bench_cycle_guard
);
criterion_main!(benches);
