// ABOUTME: Database operations for product categories
// ABOUTME: No delete guard - produits may be left referencing a removed category
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use super::{parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::CategorieProduit;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Product category database operations manager
pub struct CategorieManager {
    pool: SqlitePool,
}

impl CategorieManager {
    /// Create a new categorie manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a category
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(&self, nom: &str) -> AppResult<CategorieProduit> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO categorie_produits (id, nom, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ",
        )
        .bind(id.to_string())
        .bind(nom)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create categorie: {e}")))?;

        Ok(CategorieProduit {
            id,
            nom: nom.to_owned(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a category by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<CategorieProduit>> {
        let row = sqlx::query(
            "SELECT id, nom, created_at, updated_at FROM categorie_produits WHERE id = $1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get categorie: {e}")))?;

        row.map(|r| row_to_categorie(&r)).transpose()
    }

    /// List all categories
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self) -> AppResult<Vec<CategorieProduit>> {
        let rows = sqlx::query(
            "SELECT id, nom, created_at, updated_at FROM categorie_produits ORDER BY nom",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list categories: {e}")))?;

        rows.iter().map(row_to_categorie).collect()
    }

    /// Rename a category. Returns `None` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update(&self, id: Uuid, nom: &str) -> AppResult<Option<CategorieProduit>> {
        let result = sqlx::query(
            "UPDATE categorie_produits SET nom = $1, updated_at = $2 WHERE id = $3",
        )
        .bind(nom)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update categorie: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Delete a category; `false` when the id does not exist.
    /// Produits referencing the category are left in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM categorie_produits WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete categorie: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether a category id exists, for foreign-key validation
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM categorie_produits WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check categorie: {e}")))?;
        Ok(row.is_some())
    }
}

/// Map a database row to a `CategorieProduit`
fn row_to_categorie(row: &SqliteRow) -> AppResult<CategorieProduit> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(CategorieProduit {
        id: parse_uuid(&id)?,
        nom: row.try_get("nom")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
