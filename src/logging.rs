// ABOUTME: Logging configuration and structured logging setup for observability
// ABOUTME: Configures tracing-subscriber with env-driven level and JSON or pretty output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! Production-ready logging configuration with structured output

use anyhow::Result;
use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact single-line format
    Compact,
}

impl LogFormat {
    /// Parse from string with fallback to pretty
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter when `RUST_LOG` is unset
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
    /// Build configuration from `LOG_LEVEL` and `LOG_FORMAT` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: LogFormat::from_str_or_default(
                &env::var("LOG_FORMAT").unwrap_or_default(),
            ),
        }
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.clone()));

        let registry = tracing_subscriber::registry().with(filter);

        match self.format {
            LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
            LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init()?,
            LogFormat::Compact => registry.with(fmt::layer().compact()).try_init()?,
        }

        Ok(())
    }
}

/// Initialize logging from the environment
///
/// # Errors
///
/// Returns an error if a subscriber is already installed
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(LogFormat::from_str_or_default("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_or_default("COMPACT"), LogFormat::Compact);
        assert_eq!(LogFormat::from_str_or_default(""), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str_or_default("yaml"), LogFormat::Pretty);
    }
}
