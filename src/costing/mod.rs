// ABOUTME: Costing core - cycle guard and recursive pricing over the recipe graph
// ABOUTME: Defines the read-only store trait both engines traverse
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

//! The algorithmic core of Levain.
//!
//! Two engines operate over the persisted recipe graph:
//!
//! - [`graph`] decides whether a candidate sub-recipe edge keeps the graph
//!   acyclic, before the edge is written.
//! - [`pricing`] recursively folds ingredient and sub-recipe costs into a
//!   recipe's pricing figures, assuming an acyclic graph but defending
//!   against cycles at read time anyway.
//!
//! Both are synchronous, stateless, read-only computations; the only
//! per-call state is a branch-local visited set, never shared across
//! concurrent invocations. Read consistency is delegated to the store.

pub mod conversion;
pub mod graph;
pub mod pricing;

use crate::errors::{AppError, AppResult};
use crate::models::{Ingredient, IngredientLine, Recipe};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Traversal failure over the recipe graph
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TraversalError {
    /// The graph nests deeper than the configured cap; traversal fails
    /// closed instead of risking unbounded recursion on corrupt data.
    #[error("sub-recipe graph exceeds maximum depth of {0}")]
    DepthLimitExceeded(usize),
}

impl From<TraversalError> for AppError {
    fn from(error: TraversalError) -> Self {
        Self::internal(error.to_string())
    }
}

/// Read-only persistence surface the costing engines traverse
///
/// Implemented by [`crate::database::RecipeStore`]; tests may substitute an
/// in-memory graph. All methods are pure reads.
#[async_trait]
pub trait CostingStore: Send + Sync {
    /// Fetch a recipe by ID
    async fn recipe(&self, id: Uuid) -> AppResult<Option<Recipe>>;

    /// Fetch a priced ingredient by ID
    async fn ingredient(&self, id: Uuid) -> AppResult<Option<Ingredient>>;

    /// Fetch all ingredient lines of a recipe
    async fn ingredient_lines(&self, recipe_id: Uuid) -> AppResult<Vec<IngredientLine>>;

    /// Fetch the sub-recipe IDs a recipe directly references
    ///
    /// The outgoing edge list of `recipe_id` in the sub-recipe graph.
    async fn sub_recipe_ids(&self, recipe_id: Uuid) -> AppResult<Vec<Uuid>>;
}
