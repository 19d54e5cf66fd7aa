// ABOUTME: SQLite persistence layer for recipes, ingredients, and ingredient lines
// ABOUTME: Re-exports the RecipeStore used by services and the costing engines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

//! Relational persistence for the recipe graph.
//!
//! The store is the only write path in the crate; the costing engines read
//! through the [`crate::costing::CostingStore`] trait it implements.

pub mod recipes;

pub use recipes::RecipeStore;
