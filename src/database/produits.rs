// ABOUTME: Database operations for catalog produits with embedded owning category
// ABOUTME: Foreign-key existence is validated at the route layer before any write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use super::{parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{CategorieProduit, Produit};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Validated input for creating a produit
#[derive(Debug, Clone)]
pub struct CreateProduitRequest {
    /// Product name
    pub nom: String,
    /// Optional description
    pub description: Option<String>,
    /// Price; non-negative
    pub prix: f64,
    /// Owning category; must exist
    pub categorie_id: Uuid,
    /// Relative stored image path, if an image was uploaded
    pub image: Option<String>,
}

/// A produit joined with its owning category
#[derive(Debug, Clone)]
pub struct ProduitWithCategorie {
    /// The produit row
    pub produit: Produit,
    /// The owning category, when it still exists
    pub categorie: Option<CategorieProduit>,
}

/// Produit database operations manager
pub struct ProduitManager {
    pool: SqlitePool,
}

impl ProduitManager {
    /// Create a new produit manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a produit
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(&self, request: &CreateProduitRequest) -> AppResult<Produit> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO produits (
                id, nom, description, prix, categorie_id, image, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ",
        )
        .bind(id.to_string())
        .bind(&request.nom)
        .bind(&request.description)
        .bind(request.prix)
        .bind(request.categorie_id.to_string())
        .bind(&request.image)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create produit: {e}")))?;

        Ok(Produit {
            id,
            nom: request.nom.clone(),
            description: request.description.clone(),
            prix: request.prix,
            categorie_id: request.categorie_id,
            image: request.image.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a produit with its category
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<ProduitWithCategorie>> {
        let row = sqlx::query(&format!("{PRODUIT_SELECT} WHERE p.id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get produit: {e}")))?;

        row.map(|r| row_to_produit_with_categorie(&r)).transpose()
    }

    /// List all produits with their categories
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self) -> AppResult<Vec<ProduitWithCategorie>> {
        let rows = sqlx::query(&format!("{PRODUIT_SELECT} ORDER BY p.created_at DESC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list produits: {e}")))?;

        rows.iter().map(row_to_produit_with_categorie).collect()
    }

    /// Replace a produit's fields. Returns `None` when the id does not exist.
    /// The caller resolves whether `image` keeps the old path or takes a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update(
        &self,
        id: Uuid,
        request: &CreateProduitRequest,
    ) -> AppResult<Option<ProduitWithCategorie>> {
        let result = sqlx::query(
            r"
            UPDATE produits SET
                nom = $1, description = $2, prix = $3, categorie_id = $4,
                image = $5, updated_at = $6
            WHERE id = $7
            ",
        )
        .bind(&request.nom)
        .bind(&request.description)
        .bind(request.prix)
        .bind(request.categorie_id.to_string())
        .bind(&request.image)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update produit: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Delete a produit; `false` when the id does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM produits WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete produit: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// All stored image paths, for the orphan sweep
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn image_paths(&self) -> AppResult<Vec<String>> {
        let rows = sqlx::query("SELECT image FROM produits WHERE image IS NOT NULL")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list produit images: {e}")))?;

        rows.iter()
            .map(|r| r.try_get::<String, _>("image").map_err(Into::into))
            .collect()
    }
}

/// Produit columns joined with the owning category
const PRODUIT_SELECT: &str = r"
    SELECT p.id, p.nom, p.description, p.prix, p.categorie_id, p.image,
           p.created_at, p.updated_at,
           c.id AS cat_id, c.nom AS cat_nom, c.created_at AS cat_created_at,
           c.updated_at AS cat_updated_at
    FROM produits p
    LEFT JOIN categorie_produits c ON c.id = p.categorie_id
";

/// Map a joined row to a `ProduitWithCategorie`
fn row_to_produit_with_categorie(row: &SqliteRow) -> AppResult<ProduitWithCategorie> {
    let id: String = row.try_get("id")?;
    let categorie_id: String = row.try_get("categorie_id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    let produit = Produit {
        id: parse_uuid(&id)?,
        nom: row.try_get("nom")?,
        description: row.try_get("description")?,
        prix: row.try_get("prix")?,
        categorie_id: parse_uuid(&categorie_id)?,
        image: row.try_get("image")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    };

    let categorie = match row.try_get::<Option<String>, _>("cat_id")? {
        Some(cat_id) => {
            let cat_created: String = row.try_get("cat_created_at")?;
            let cat_updated: String = row.try_get("cat_updated_at")?;
            Some(CategorieProduit {
                id: parse_uuid(&cat_id)?,
                nom: row.try_get("cat_nom")?,
                created_at: parse_timestamp(&cat_created)?,
                updated_at: parse_timestamp(&cat_updated)?,
            })
        }
        None => None,
    };

    Ok(ProduitWithCategorie { produit, categorie })
}
