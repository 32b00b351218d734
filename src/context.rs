// ABOUTME: Shared server resources passed to every route module via Arc
// ABOUTME: Database, auth, image store, and config are constructed once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::storage::ImageStore;

/// Resources shared by all request handlers.
/// Constructed once at startup and handed to route modules as `Arc<Self>`.
pub struct ServerResources {
    /// Connection pool and table managers
    pub database: Database,
    /// Token issue/validate and password hashing
    pub auth: AuthManager,
    /// Uploaded image store
    pub images: ImageStore,
    /// Runtime configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Assemble resources from their startup-constructed parts
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        let auth = AuthManager::new(
            &config.auth.jwt_secret,
            config.auth.jwt_expiry_hours,
            config.auth.bcrypt_cost,
        );
        let images = ImageStore::new(
            config.storage.upload_dir.clone(),
            config.storage.public_base_url.clone(),
        );
        Self {
            database,
            auth,
            images,
            config,
        }
    }
}
