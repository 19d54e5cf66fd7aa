// ABOUTME: Environment-based configuration for the costing core
// ABOUTME: Provides margin defaults and graph traversal limits with a lazy global
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

//! Environment-only configuration.
//!
//! All tunables are read from environment variables once and exposed via
//! [`CostingConfig::global`]. Invalid values are logged and replaced by the
//! defaults rather than failing startup.

use std::env;
use std::sync::LazyLock;
use tracing::warn;

/// Default multiplier applied to total cost to derive the suggested price
pub const DEFAULT_MARGIN_COEFFICIENT: f64 = 3.0;

/// Default recursion depth cap for graph traversal and pricing
///
/// Real recipe graphs are a handful of levels deep; the cap exists to bound
/// stack usage against pathological or corrupted data.
pub const DEFAULT_MAX_GRAPH_DEPTH: usize = 200;

static GLOBAL_CONFIG: LazyLock<CostingConfig> = LazyLock::new(CostingConfig::from_env);

/// Runtime configuration for the costing core
#[derive(Debug, Clone)]
pub struct CostingConfig {
    /// Margin coefficient used when a caller does not supply one
    pub default_margin_coefficient: f64,
    /// Maximum sub-recipe nesting depth before traversal fails closed
    pub max_graph_depth: usize,
}

impl Default for CostingConfig {
    fn default() -> Self {
        Self {
            default_margin_coefficient: DEFAULT_MARGIN_COEFFICIENT,
            max_graph_depth: DEFAULT_MAX_GRAPH_DEPTH,
        }
    }
}

impl CostingConfig {
    /// Get the process-wide configuration, loaded from the environment once
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_CONFIG
    }

    /// Load configuration from environment variables
    ///
    /// Recognized variables:
    /// - `LEVAIN_DEFAULT_MARGIN_COEFFICIENT` - positive float, default 3.0
    /// - `LEVAIN_MAX_GRAPH_DEPTH` - positive integer, default 200
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var("LEVAIN_DEFAULT_MARGIN_COEFFICIENT") {
            match raw.parse::<f64>() {
                Ok(value) if value > 0.0 && value.is_finite() => {
                    config.default_margin_coefficient = value;
                }
                _ => {
                    warn!(
                        value = %raw,
                        "Invalid LEVAIN_DEFAULT_MARGIN_COEFFICIENT, using default {DEFAULT_MARGIN_COEFFICIENT}"
                    );
                }
            }
        }

        if let Ok(raw) = env::var("LEVAIN_MAX_GRAPH_DEPTH") {
            match raw.parse::<usize>() {
                Ok(value) if value > 0 => config.max_graph_depth = value,
                _ => {
                    warn!(
                        value = %raw,
                        "Invalid LEVAIN_MAX_GRAPH_DEPTH, using default {DEFAULT_MAX_GRAPH_DEPTH}"
                    );
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_without_env() {
        env::remove_var("LEVAIN_DEFAULT_MARGIN_COEFFICIENT");
        env::remove_var("LEVAIN_MAX_GRAPH_DEPTH");

        let config = CostingConfig::from_env();
        assert!((config.default_margin_coefficient - DEFAULT_MARGIN_COEFFICIENT).abs() < f64::EPSILON);
        assert_eq!(config.max_graph_depth, DEFAULT_MAX_GRAPH_DEPTH);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        env::set_var("LEVAIN_DEFAULT_MARGIN_COEFFICIENT", "2.5");
        env::set_var("LEVAIN_MAX_GRAPH_DEPTH", "50");

        let config = CostingConfig::from_env();
        assert!((config.default_margin_coefficient - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.max_graph_depth, 50);

        env::remove_var("LEVAIN_DEFAULT_MARGIN_COEFFICIENT");
        env::remove_var("LEVAIN_MAX_GRAPH_DEPTH");
    }

    #[test]
    #[serial]
    fn test_invalid_values_fall_back_to_defaults() {
        env::set_var("LEVAIN_DEFAULT_MARGIN_COEFFICIENT", "-1");
        env::set_var("LEVAIN_MAX_GRAPH_DEPTH", "zero");

        let config = CostingConfig::from_env();
        assert!((config.default_margin_coefficient - DEFAULT_MARGIN_COEFFICIENT).abs() < f64::EPSILON);
        assert_eq!(config.max_graph_depth, DEFAULT_MAX_GRAPH_DEPTH);

        env::remove_var("LEVAIN_DEFAULT_MARGIN_COEFFICIENT");
        env::remove_var("LEVAIN_MAX_GRAPH_DEPTH");
    }
}
