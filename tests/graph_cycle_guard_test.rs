// ABOUTME: Integration tests for the sub-recipe cycle guard
// ABOUTME: Covers self-reference, cycle closure, diamond DAGs, and depth fail-closed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

mod common;

use anyhow::Result;
use common::{create_test_store, link_sub_recipe, seed_recipe};
use levain_core::costing::graph::{can_add_sub_recipe, can_add_sub_recipe_bounded};
use uuid::Uuid;

#[tokio::test]
async fn test_self_reference_is_always_rejected() -> Result<()> {
    let store = create_test_store().await?;
    let user = Uuid::new_v4();
    let recipe = seed_recipe(&store, user, "Croissant dough", 12).await?;

    assert!(!can_add_sub_recipe(&store, recipe.id, recipe.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_edge_closing_a_three_cycle_is_rejected() -> Result<()> {
    let store = create_test_store().await?;
    let user = Uuid::new_v4();
    let a = seed_recipe(&store, user, "A", 1).await?;
    let b = seed_recipe(&store, user, "B", 1).await?;
    let c = seed_recipe(&store, user, "C", 1).await?;

    link_sub_recipe(&store, a.id, b.id, 0.0).await?;
    link_sub_recipe(&store, b.id, c.id, 0.0).await?;

    // C is reachable from A (A->B->C), so giving C the sub-recipe A would
    // close the loop.
    assert!(!can_add_sub_recipe(&store, c.id, a.id).await?);

    // An unrelated recipe may freely take A as a sub-recipe
    let d = seed_recipe(&store, user, "D", 1).await?;
    assert!(can_add_sub_recipe(&store, d.id, a.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_direct_back_edge_is_rejected() -> Result<()> {
    let store = create_test_store().await?;
    let user = Uuid::new_v4();
    let parent = seed_recipe(&store, user, "Tarte", 8).await?;
    let child = seed_recipe(&store, user, "Pate sucree", 0).await?;

    assert!(can_add_sub_recipe(&store, parent.id, child.id).await?);
    link_sub_recipe(&store, parent.id, child.id, 0.0).await?;

    assert!(!can_add_sub_recipe(&store, child.id, parent.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_diamond_dag_is_not_flagged_as_cyclic() -> Result<()> {
    let store = create_test_store().await?;
    let user = Uuid::new_v4();
    let a = seed_recipe(&store, user, "A", 1).await?;
    let b = seed_recipe(&store, user, "B", 1).await?;
    let c = seed_recipe(&store, user, "C", 1).await?;
    let d = seed_recipe(&store, user, "D", 1).await?;

    // Build the diamond incrementally, asking the guard before every edge:
    // A->B, A->C, B->D, C->D. D is reachable from A via two paths, which is
    // legitimate convergence, not a cycle.
    for (parent, child) in [(a.id, b.id), (a.id, c.id), (b.id, d.id), (c.id, d.id)] {
        assert!(can_add_sub_recipe(&store, parent, child).await?);
        link_sub_recipe(&store, parent, child, 0.0).await?;
    }

    // The finished diamond still rejects a true back edge
    assert!(!can_add_sub_recipe(&store, d.id, a.id).await?);
    // And still accepts forward additions elsewhere
    let e = seed_recipe(&store, user, "E", 1).await?;
    assert!(can_add_sub_recipe(&store, d.id, e.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_incremental_chain_is_never_rejected() -> Result<()> {
    let store = create_test_store().await?;
    let user = Uuid::new_v4();

    let mut previous = seed_recipe(&store, user, "Level 0", 1).await?;
    for level in 1..6 {
        let next = seed_recipe(&store, user, &format!("Level {level}"), 1).await?;
        assert!(can_add_sub_recipe(&store, previous.id, next.id).await?);
        link_sub_recipe(&store, previous.id, next.id, 0.0).await?;
        previous = next;
    }
    Ok(())
}

#[tokio::test]
async fn test_depth_limit_fails_closed() -> Result<()> {
    let store = create_test_store().await?;
    let user = Uuid::new_v4();

    let top = seed_recipe(&store, user, "Top", 1).await?;
    let mut previous = top.clone();
    for level in 1..8 {
        let next = seed_recipe(&store, user, &format!("Deep {level}"), 1).await?;
        link_sub_recipe(&store, previous.id, next.id, 0.0).await?;
        previous = next;
    }

    let unrelated = seed_recipe(&store, user, "Unrelated", 1).await?;

    // The chain is 8 levels deep; a cap of 3 must produce an error rather
    // than a quiet verdict either way.
    let result = can_add_sub_recipe_bounded(&store, unrelated.id, top.id, 3).await;
    assert!(result.is_err());

    // A generous cap lets the same check succeed
    assert!(can_add_sub_recipe_bounded(&store, unrelated.id, top.id, 100).await?);
    Ok(())
}
