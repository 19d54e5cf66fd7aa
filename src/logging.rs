// ABOUTME: Logging configuration and structured logging setup for the costing core
// ABOUTME: Configures log levels and output format via tracing-subscriber
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Levain Systems

//! Structured logging setup with environment-driven configuration.
//!
//! The core itself only emits `tracing` events (unit-mismatch warnings,
//! defensive cycle diagnostics); binaries and the surrounding service call
//! [`init_logging`] once at startup to install a subscriber.

use crate::errors::{AppError, AppResult};
use std::env;
use std::io;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter directive (e.g. "info", "levain_core=debug")
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Load logging configuration from `RUST_LOG` and `LOG_FORMAT`
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };
        Self { level, format }
    }
}

/// Initialize the global tracing subscriber
///
/// # Errors
///
/// Returns a configuration error if the level filter cannot be parsed or a
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| AppError::config(format!("Invalid log filter '{}': {e}", config.level)))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .with_target(true)
                .with_writer(io::stdout)
                .json();
            registry.with(layer).try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer().with_target(true).with_writer(io::stdout);
            registry.with(layer).try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stdout);
            registry.with(layer).try_init()
        }
    };

    result.map_err(|e| AppError::config(format!("Failed to install subscriber: {e}")))
}
