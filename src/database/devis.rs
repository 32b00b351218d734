// ABOUTME: Database operations for quote requests (devis) - CRUD plus live dashboard statistics
// ABOUTME: New submissions always start at statut nouveau; statistics exclude annule by design
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use super::{parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{Devis, DevisStatus, DevisType};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Validated input for creating a devis
#[derive(Debug, Clone)]
pub struct CreateDevisRequest {
    /// Submitter name
    pub nom: String,
    /// Submitter email
    pub email: String,
    /// Optional phone number
    pub telephone: Option<String>,
    /// Subject line
    pub objet: String,
    /// Free-form request body
    pub message: String,
    /// What kind of quote is requested
    pub type_devis: DevisType,
}

/// Validated partial patch for a devis; `None` fields keep their stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateDevisRequest {
    /// New status (if provided)
    pub statut: Option<DevisStatus>,
    /// New name (if provided)
    pub nom: Option<String>,
    /// New email (if provided)
    pub email: Option<String>,
    /// New phone; `Some(None)` clears the stored value
    pub telephone: Option<Option<String>>,
    /// New subject (if provided)
    pub objet: Option<String>,
    /// New message (if provided)
    pub message: Option<String>,
    /// New request type (if provided)
    pub type_devis: Option<DevisType>,
}

/// Dashboard counts over the devis table.
/// `annule` is intentionally excluded from the breakdown; the sum of the
/// three status counts may be less than `total`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DevisStatistics {
    /// All rows
    pub total: i64,
    /// Rows with statut nouveau
    pub nouveau: i64,
    /// Rows with statut en_cours
    pub en_cours: i64,
    /// Rows with statut traite
    pub traite: i64,
}

/// Devis database operations manager
pub struct DevisManager {
    pool: SqlitePool,
}

impl DevisManager {
    /// Create a new devis manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new devis; status always starts at `nouveau`
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(&self, request: &CreateDevisRequest) -> AppResult<Devis> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO devis (
                id, nom, email, telephone, objet, message,
                type_devis, statut, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            ",
        )
        .bind(id.to_string())
        .bind(&request.nom)
        .bind(&request.email)
        .bind(&request.telephone)
        .bind(&request.objet)
        .bind(&request.message)
        .bind(request.type_devis.as_str())
        .bind(DevisStatus::Nouveau.as_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create devis: {e}")))?;

        Ok(Devis {
            id,
            nom: request.nom.clone(),
            email: request.email.clone(),
            telephone: request.telephone.clone(),
            objet: request.objet.clone(),
            message: request.message.clone(),
            type_devis: request.type_devis,
            statut: DevisStatus::Nouveau,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a devis by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<Devis>> {
        let row = sqlx::query(
            r"
            SELECT id, nom, email, telephone, objet, message,
                   type_devis, statut, created_at, updated_at
            FROM devis
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get devis: {e}")))?;

        row.map(|r| row_to_devis(&r)).transpose()
    }

    /// List all devis, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self) -> AppResult<Vec<Devis>> {
        let rows = sqlx::query(
            r"
            SELECT id, nom, email, telephone, objet, message,
                   type_devis, statut, created_at, updated_at
            FROM devis
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list devis: {e}")))?;

        rows.iter().map(row_to_devis).collect()
    }

    /// Apply a partial patch; only supplied fields are persisted.
    /// Returns `None` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update(&self, id: Uuid, request: &UpdateDevisRequest) -> AppResult<Option<Devis>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        let statut = request.statut.unwrap_or(existing.statut);
        let nom = request.nom.as_ref().unwrap_or(&existing.nom);
        let email = request.email.as_ref().unwrap_or(&existing.email);
        let telephone = match request.telephone.clone() {
            None => existing.telephone,
            Some(value) => value,
        };
        let objet = request.objet.as_ref().unwrap_or(&existing.objet);
        let message = request.message.as_ref().unwrap_or(&existing.message);
        let type_devis = request.type_devis.unwrap_or(existing.type_devis);

        sqlx::query(
            r"
            UPDATE devis SET
                nom = $1, email = $2, telephone = $3, objet = $4,
                message = $5, type_devis = $6, statut = $7, updated_at = $8
            WHERE id = $9
            ",
        )
        .bind(nom)
        .bind(email)
        .bind(&telephone)
        .bind(objet)
        .bind(message)
        .bind(type_devis.as_str())
        .bind(statut.as_str())
        .bind(now.to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update devis: {e}")))?;

        self.get(id).await
    }

    /// Permanently delete a devis; `false` when the id does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM devis WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete devis: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Live dashboard counts, computed at call time
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn statistics(&self) -> AppResult<DevisStatistics> {
        let row = sqlx::query(
            r"
            SELECT
                COUNT(*) AS total,
                SUM(CASE WHEN statut = 'nouveau' THEN 1 ELSE 0 END) AS nouveau,
                SUM(CASE WHEN statut = 'en_cours' THEN 1 ELSE 0 END) AS en_cours,
                SUM(CASE WHEN statut = 'traite' THEN 1 ELSE 0 END) AS traite
            FROM devis
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to compute devis statistics: {e}")))?;

        Ok(DevisStatistics {
            total: row.try_get("total")?,
            // SUM over zero rows is NULL
            nouveau: row.try_get::<Option<i64>, _>("nouveau")?.unwrap_or(0),
            en_cours: row.try_get::<Option<i64>, _>("en_cours")?.unwrap_or(0),
            traite: row.try_get::<Option<i64>, _>("traite")?.unwrap_or(0),
        })
    }
}

/// Map a database row to a `Devis`
fn row_to_devis(row: &SqliteRow) -> AppResult<Devis> {
    let type_str: String = row.try_get("type_devis")?;
    let statut_str: String = row.try_get("statut")?;
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Devis {
        id: parse_uuid(&id)?,
        nom: row.try_get("nom")?,
        email: row.try_get("email")?,
        telephone: row.try_get("telephone")?,
        objet: row.try_get("objet")?,
        message: row.try_get("message")?,
        type_devis: DevisType::parse(&type_str)
            .ok_or_else(|| AppError::database(format!("Corrupt type_devis '{type_str}'")))?,
        statut: DevisStatus::parse(&statut_str)
            .ok_or_else(|| AppError::database(format!("Corrupt statut '{statut_str}'")))?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
