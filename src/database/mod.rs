// ABOUTME: Database connection management and schema migration for the SQLite store
// ABOUTME: One manager per table; managers are cheap handles over the shared pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! Database layer
//!
//! `Database` owns the SQLx pool and runs the idempotent schema migration at
//! startup. Each table gets a `*Manager` with the CRUD operations its routes
//! need; managers are constructed on demand from the pool.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Contact message operations
pub mod contacts;
/// Quote request (devis) operations
pub mod devis;
/// Product category operations
pub mod categories;
/// Product operations
pub mod produits;
/// Service type operations
pub mod service_types;
/// Service operations
pub mod services;
/// User account operations
pub mod users;

pub use categories::CategorieManager;
pub use contacts::{ContactManager, ContactStatistics};
pub use devis::{DevisManager, DevisStatistics};
pub use produits::ProduitManager;
pub use service_types::ServiceTypeManager;
pub use services::ServiceManager;
pub use users::UserManager;

/// Schema creation statements, executed in order at startup
const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        display_name TEXT,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS devis (
        id TEXT PRIMARY KEY,
        nom TEXT NOT NULL,
        email TEXT NOT NULL,
        telephone TEXT,
        objet TEXT NOT NULL,
        message TEXT NOT NULL,
        type_devis TEXT NOT NULL DEFAULT 'service',
        statut TEXT NOT NULL DEFAULT 'nouveau',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS contacts (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT,
        subject TEXT NOT NULL,
        message TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'new',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS categorie_produits (
        id TEXT PRIMARY KEY,
        nom TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS produits (
        id TEXT PRIMARY KEY,
        nom TEXT NOT NULL,
        description TEXT,
        prix REAL NOT NULL,
        categorie_id TEXT NOT NULL REFERENCES categorie_produits(id),
        image TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS service_types (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS services (
        id TEXT PRIMARY KEY,
        nom TEXT NOT NULL,
        description TEXT,
        prix REAL,
        type_id TEXT NOT NULL REFERENCES service_types(id),
        image TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_devis_statut ON devis(statut)",
    "CREATE INDEX IF NOT EXISTS idx_contacts_status ON contacts(status)",
    "CREATE INDEX IF NOT EXISTS idx_produits_categorie ON produits(categorie_id)",
    "CREATE INDEX IF NOT EXISTS idx_services_type ON services(type_id)",
];

/// Connection pool and manager factory for the relational store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database, creating the file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection fails
    pub async fn new(url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
            .create_if_missing(true);

        // An in-memory database exists per connection; more than one
        // connection would see different stores
        let max_connections = if url.contains(":memory:") {
            1
        } else {
            max_connections
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect: {e}")))?;

        Ok(Self { pool })
    }

    /// Run the idempotent schema migration
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        tracing::debug!("database schema up to date");
        Ok(())
    }

    /// Access the underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Devis operations
    #[must_use]
    pub fn devis(&self) -> DevisManager {
        DevisManager::new(self.pool.clone())
    }

    /// Contact operations
    #[must_use]
    pub fn contacts(&self) -> ContactManager {
        ContactManager::new(self.pool.clone())
    }

    /// Product operations
    #[must_use]
    pub fn produits(&self) -> ProduitManager {
        ProduitManager::new(self.pool.clone())
    }

    /// Service operations
    #[must_use]
    pub fn services(&self) -> ServiceManager {
        ServiceManager::new(self.pool.clone())
    }

    /// Product category operations
    #[must_use]
    pub fn categories(&self) -> CategorieManager {
        CategorieManager::new(self.pool.clone())
    }

    /// Service type operations
    #[must_use]
    pub fn service_types(&self) -> ServiceTypeManager {
        ServiceTypeManager::new(self.pool.clone())
    }

    /// User account operations
    #[must_use]
    pub fn users(&self) -> UserManager {
        UserManager::new(self.pool.clone())
    }
}

/// Parse a stored RFC 3339 timestamp column
pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Corrupt timestamp '{value}': {e}")))
}

/// Parse a stored UUID column
pub(crate) fn parse_uuid(value: &str) -> AppResult<uuid::Uuid> {
    uuid::Uuid::parse_str(value)
        .map_err(|e| AppError::database(format!("Corrupt id '{value}': {e}")))
}
