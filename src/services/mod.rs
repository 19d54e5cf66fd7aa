// ABOUTME: Business logic between the persistence layer and external controllers
// ABOUTME: Guarded line creation and dashboard pricing aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

//! Service layer.
//!
//! Controllers (outside this crate) call these functions rather than the
//! store directly; this is where the cycle guard gates writes and where
//! input validation lives.

pub mod dashboard;
pub mod recipes;
