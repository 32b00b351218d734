// ABOUTME: Database operations for service types with unique names and a delete guard
// ABOUTME: A type with associated services cannot be deleted - explicit count check first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use super::{parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::ServiceType;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Validated input for creating or updating a service type
#[derive(Debug, Clone)]
pub struct ServiceTypeRequest {
    /// Type name; unique across the table
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

/// A service type with its associated-service count, for list views
#[derive(Debug, Clone)]
pub struct ServiceTypeWithCount {
    /// The service type row
    pub service_type: ServiceType,
    /// Number of services referencing this type
    pub services_count: i64,
}

/// Outcome of a guarded delete attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteServiceTypeOutcome {
    /// The type was deleted
    Deleted,
    /// No row with that id
    NotFound,
    /// Refused: services still reference the type
    InUse,
}

/// Service type database operations manager
pub struct ServiceTypeManager {
    pool: SqlitePool,
}

impl ServiceTypeManager {
    /// Create a new service type manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a service type
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the name is taken, or a database error
    pub async fn create(&self, request: &ServiceTypeRequest) -> AppResult<ServiceType> {
        if self.name_taken(&request.name, None).await? {
            return Err(AppError::conflict(format!(
                "Un type de service nommé '{}' existe déjà.",
                request.name
            )));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO service_types (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ",
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.description)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create service type: {e}")))?;

        Ok(ServiceType {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a service type by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<ServiceType>> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM service_types WHERE id = $1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get service type: {e}")))?;

        row.map(|r| row_to_service_type(&r)).transpose()
    }

    /// List all service types with their associated-service counts
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self) -> AppResult<Vec<ServiceTypeWithCount>> {
        let rows = sqlx::query(
            r"
            SELECT t.id, t.name, t.description, t.created_at, t.updated_at,
                   (SELECT COUNT(*) FROM services s WHERE s.type_id = t.id) AS services_count
            FROM service_types t
            ORDER BY t.name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list service types: {e}")))?;

        rows.iter()
            .map(|r| {
                Ok(ServiceTypeWithCount {
                    service_type: row_to_service_type(r)?,
                    services_count: r.try_get("services_count")?,
                })
            })
            .collect()
    }

    /// Update a service type. Returns `None` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the new name belongs to another type
    pub async fn update(
        &self,
        id: Uuid,
        request: &ServiceTypeRequest,
    ) -> AppResult<Option<ServiceType>> {
        if self.name_taken(&request.name, Some(id)).await? {
            return Err(AppError::conflict(format!(
                "Un type de service nommé '{}' existe déjà.",
                request.name
            )));
        }

        let result = sqlx::query(
            r"
            UPDATE service_types SET name = $1, description = $2, updated_at = $3 WHERE id = $4
            ",
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update service type: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Guarded delete: refused while any service still references the type
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteServiceTypeOutcome> {
        if self.get(id).await?.is_none() {
            return Ok(DeleteServiceTypeOutcome::NotFound);
        }

        if self.services_count(id).await? > 0 {
            return Ok(DeleteServiceTypeOutcome::InUse);
        }

        sqlx::query("DELETE FROM service_types WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete service type: {e}")))?;

        Ok(DeleteServiceTypeOutcome::Deleted)
    }

    /// Whether a service type id exists, for foreign-key validation
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.get(id).await?.is_some())
    }

    /// Count of services referencing a type
    async fn services_count(&self, id: Uuid) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM services WHERE type_id = $1")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count services: {e}")))?;
        Ok(row.try_get("n")?)
    }

    /// Whether a name is already used, optionally excluding one id (self on update)
    async fn name_taken(&self, name: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let row = match exclude {
            Some(id) => {
                sqlx::query("SELECT 1 FROM service_types WHERE name = $1 AND id != $2")
                    .bind(name)
                    .bind(id.to_string())
                    .fetch_optional(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT 1 FROM service_types WHERE name = $1")
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to check service type name: {e}")))?;

        Ok(row.is_some())
    }
}

/// Map a database row to a `ServiceType`
fn row_to_service_type(row: &SqliteRow) -> AppResult<ServiceType> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(ServiceType {
        id: parse_uuid(&id)?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
