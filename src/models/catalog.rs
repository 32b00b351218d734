// ABOUTME: Catalog entities - produits, services, product categories, and service types
// ABOUTME: Produits and services hold optional stored image paths resolved to URLs at read time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product category; one-to-many owner of produits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorieProduit {
    /// Unique identifier
    pub id: Uuid,
    /// Category name
    pub nom: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Produit {
    /// Unique identifier
    pub id: Uuid,
    /// Product name
    pub nom: String,
    /// Optional description
    pub description: Option<String>,
    /// Price; non-negative
    pub prix: f64,
    /// Owning category
    pub categorie_id: Uuid,
    /// Relative stored image path, if any
    pub image: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A service type; one-to-many owner of services.
/// Cannot be deleted while services still reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceType {
    /// Unique identifier
    pub id: Uuid,
    /// Type name; unique
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A catalog service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier
    pub id: Uuid,
    /// Service name
    pub nom: String,
    /// Optional description
    pub description: Option<String>,
    /// Price; absent means "quote on request"
    pub prix: Option<f64>,
    /// Owning service type
    pub type_id: Uuid,
    /// Relative stored image path, if any
    pub image: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
