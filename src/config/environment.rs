// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into typed sub-configs for HTTP, database, auth, storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! Environment-based configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default HTTP port when `HTTP_PORT` is unset
const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default JWT lifetime in hours
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
/// Default database location
const DEFAULT_DATABASE_URL: &str = "sqlite:data/usa_home.db";
/// Default directory for uploaded images
const DEFAULT_UPLOAD_DIR: &str = "storage";

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Database settings
    pub database: DatabaseConfig,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Uploaded image storage settings
    pub storage: StorageConfig,
    /// Comma-separated CORS origins; empty or "*" allows any
    pub cors_allowed_origins: String,
    /// Enforce the devis status adjacency graph on update.
    /// Off by default; updates then accept any-to-any transitions.
    pub strict_status_transitions: bool,
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLx connection URL (sqlite)
    pub url: String,
    /// Maximum pool connections
    pub max_connections: u32,
}

/// Authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_expiry_hours: i64,
    /// Bcrypt work factor
    pub bcrypt_cost: u32,
    /// Email granted the admin role at registration, if any
    pub admin_email: Option<String>,
}

/// Uploaded image storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored images
    pub upload_dir: PathBuf,
    /// Base URL prefixed to relative image paths in responses
    pub public_base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is unset or a numeric variable
    /// fails to parse
    pub fn from_env() -> Result<Self> {
        let http_port = parse_env("HTTP_PORT", DEFAULT_HTTP_PORT)?;

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into()),
            max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5)?,
        };

        let auth = AuthConfig {
            jwt_secret: env::var("JWT_SECRET")
                .context("JWT_SECRET environment variable is required")?,
            jwt_expiry_hours: parse_env("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
            bcrypt_cost: parse_env("BCRYPT_COST", u32::from(bcrypt::DEFAULT_COST))?,
            admin_email: env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
        };

        let storage = StorageConfig {
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.into())
                .into(),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{http_port}")),
        };

        Ok(Self {
            http_port,
            database,
            auth,
            storage,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            strict_status_transitions: env::var("DEVIS_STRICT_TRANSITIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}

/// Parse an environment variable with a fallback default
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("invalid value for {name}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default() {
        assert_eq!(
            parse_env("USA_HOME_TEST_UNSET_VAR", 42u16).unwrap(),
            42
        );
    }
}
