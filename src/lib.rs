// ABOUTME: Main library entry point for the Levain bakery costing core
// ABOUTME: Exposes recipe models, persistence, cycle guard, and pricing engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

#![deny(unsafe_code)]

//! # Levain Core
//!
//! The costing core of the Levain bakery management platform. Recipes may
//! reference other recipes as sub-recipe ingredients, forming a directed
//! graph; this crate keeps that graph acyclic at write time and folds
//! ingredient and sub-recipe costs into pricing figures at read time.
//!
//! ## Components
//!
//! - **Models**: recipes, priced ingredients, and ingredient lines
//! - **Database**: `SQLite`-backed relational store for the recipe graph
//! - **Costing**: cycle guard and recursive pricing engine
//! - **Services**: guarded line creation and dashboard aggregation
//!
//! HTTP routing, authentication, and label rendering live outside this
//! crate; controllers consume the service and costing APIs directly.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use levain_core::costing::pricing::calculate_pricing;
//! use levain_core::database::RecipeStore;
//! use levain_core::errors::AppResult;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let store = RecipeStore::connect("sqlite:levain.db").await?;
//!     store.migrate().await?;
//!
//!     let recipe_id = Uuid::new_v4();
//!     let pricing = calculate_pricing(&store, recipe_id, None).await?;
//!     println!("suggested price: {}", pricing.suggested_price);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod costing;
pub mod database;
pub mod errors;
pub mod logging;
pub mod models;
pub mod services;
