// ABOUTME: Configuration module organization for environment-driven server settings
// ABOUTME: All runtime configuration comes from environment variables with sane defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

/// Environment-based server configuration
pub mod environment;

pub use environment::{AuthConfig, DatabaseConfig, ServerConfig, StorageConfig};
