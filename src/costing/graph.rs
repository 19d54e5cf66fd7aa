// ABOUTME: Cycle guard for the sub-recipe reference graph
// ABOUTME: Decides whether a candidate edge preserves acyclicity before it is persisted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

//! Write-time cycle prevention.
//!
//! Before a sub-recipe ingredient line is persisted, the controller asks
//! [`can_add_sub_recipe`] whether the new edge would close a cycle. A
//! `false` verdict means the caller must reject the write with a client
//! error; it is not an error condition in itself.

use crate::config::CostingConfig;
use crate::costing::{CostingStore, TraversalError};
use crate::errors::AppResult;
use futures_util::future::BoxFuture;
use std::collections::HashSet;
use uuid::Uuid;

/// Check whether adding `sub_recipe_id` as an ingredient of `recipe_id`
/// preserves acyclicity of the sub-recipe graph
///
/// Performs a depth-first search from `sub_recipe_id` over the edges already
/// persisted, looking for a path back to `recipe_id`. If one exists, the
/// proposed edge would close a cycle and the verdict is `false`.
///
/// Worst case O(V*E): every visited node issues a fresh edge read. Recipe
/// graphs are shallow in practice, so no per-traversal caching is done.
///
/// No ownership or existence check is performed here; callers pre-validate
/// both identifiers.
///
/// # Errors
///
/// Returns an error if an edge read fails or the graph nests deeper than
/// the configured maximum depth (fail closed on corrupt data).
pub async fn can_add_sub_recipe<S: CostingStore>(
    store: &S,
    recipe_id: Uuid,
    sub_recipe_id: Uuid,
) -> AppResult<bool> {
    can_add_sub_recipe_bounded(
        store,
        recipe_id,
        sub_recipe_id,
        CostingConfig::global().max_graph_depth,
    )
    .await
}

/// [`can_add_sub_recipe`] with an explicit traversal depth cap
///
/// # Errors
///
/// Returns an error if an edge read fails or `max_depth` is exceeded.
pub async fn can_add_sub_recipe_bounded<S: CostingStore>(
    store: &S,
    recipe_id: Uuid,
    sub_recipe_id: Uuid,
    max_depth: usize,
) -> AppResult<bool> {
    // Self-reference is an immediate cycle
    if recipe_id == sub_recipe_id {
        return Ok(false);
    }

    let cyclic = would_cycle(store, sub_recipe_id, recipe_id, HashSet::new(), 0, max_depth).await?;
    Ok(!cyclic)
}

/// DFS from `node` looking for `target` along existing sub-recipe edges
///
/// Reports `true` when `target` is reachable, or when any node already on
/// the current traversal path reappears (a pre-existing cycle reachable from
/// the candidate, unsafe regardless of the target).
///
/// `path` is branch-local: every recursive call receives its own copy, so a
/// diamond-shaped DAG where the same recipe is legitimately reachable via
/// two different paths is never a false positive.
fn would_cycle<'a, S: CostingStore>(
    store: &'a S,
    node: Uuid,
    target: Uuid,
    path: HashSet<Uuid>,
    depth: usize,
    max_depth: usize,
) -> BoxFuture<'a, AppResult<bool>> {
    Box::pin(async move {
        if depth > max_depth {
            return Err(TraversalError::DepthLimitExceeded(max_depth).into());
        }
        if node == target {
            return Ok(true);
        }
        if path.contains(&node) {
            return Ok(true);
        }

        let mut branch_path = path;
        branch_path.insert(node);

        for child in store.sub_recipe_ids(node).await? {
            if would_cycle(store, child, target, branch_path.clone(), depth + 1, max_depth).await? {
                return Ok(true);
            }
        }

        Ok(false)
    })
}
