// ABOUTME: Database operations for catalog services with embedded owning service type
// ABOUTME: Price is optional - absence means quote on request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use super::{parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{Service, ServiceType};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Validated input for creating a service
#[derive(Debug, Clone)]
pub struct CreateServiceRequest {
    /// Service name
    pub nom: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional price; absence means "quote on request"
    pub prix: Option<f64>,
    /// Owning service type; must exist
    pub type_id: Uuid,
    /// Relative stored image path, if an image was uploaded
    pub image: Option<String>,
}

/// A service joined with its owning type
#[derive(Debug, Clone)]
pub struct ServiceWithType {
    /// The service row
    pub service: Service,
    /// The owning service type
    pub service_type: Option<ServiceType>,
}

/// Service database operations manager
pub struct ServiceManager {
    pool: SqlitePool,
}

impl ServiceManager {
    /// Create a new service manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a service
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(&self, request: &CreateServiceRequest) -> AppResult<Service> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO services (
                id, nom, description, prix, type_id, image, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ",
        )
        .bind(id.to_string())
        .bind(&request.nom)
        .bind(&request.description)
        .bind(request.prix)
        .bind(request.type_id.to_string())
        .bind(&request.image)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create service: {e}")))?;

        Ok(Service {
            id,
            nom: request.nom.clone(),
            description: request.description.clone(),
            prix: request.prix,
            type_id: request.type_id,
            image: request.image.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a service with its type
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<ServiceWithType>> {
        let row = sqlx::query(&format!("{SERVICE_SELECT} WHERE s.id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get service: {e}")))?;

        row.map(|r| row_to_service_with_type(&r)).transpose()
    }

    /// List all services with their types
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self) -> AppResult<Vec<ServiceWithType>> {
        let rows = sqlx::query(&format!("{SERVICE_SELECT} ORDER BY s.created_at DESC"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list services: {e}")))?;

        rows.iter().map(row_to_service_with_type).collect()
    }

    /// List the services referencing a type, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list_for_type(&self, type_id: Uuid) -> AppResult<Vec<ServiceWithType>> {
        let rows = sqlx::query(&format!(
            "{SERVICE_SELECT} WHERE s.type_id = $1 ORDER BY s.created_at DESC"
        ))
        .bind(type_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list services for type: {e}")))?;

        rows.iter().map(row_to_service_with_type).collect()
    }

    /// Replace a service's fields. Returns `None` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update(
        &self,
        id: Uuid,
        request: &CreateServiceRequest,
    ) -> AppResult<Option<ServiceWithType>> {
        let result = sqlx::query(
            r"
            UPDATE services SET
                nom = $1, description = $2, prix = $3, type_id = $4,
                image = $5, updated_at = $6
            WHERE id = $7
            ",
        )
        .bind(&request.nom)
        .bind(&request.description)
        .bind(request.prix)
        .bind(request.type_id.to_string())
        .bind(&request.image)
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update service: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Delete a service; `false` when the id does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete service: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// All stored image paths, for the orphan sweep
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn image_paths(&self) -> AppResult<Vec<String>> {
        let rows = sqlx::query("SELECT image FROM services WHERE image IS NOT NULL")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list service images: {e}")))?;

        rows.iter()
            .map(|r| r.try_get::<String, _>("image").map_err(Into::into))
            .collect()
    }
}

/// Service columns joined with the owning type
const SERVICE_SELECT: &str = r"
    SELECT s.id, s.nom, s.description, s.prix, s.type_id, s.image,
           s.created_at, s.updated_at,
           t.id AS st_id, t.name AS st_name, t.description AS st_description,
           t.created_at AS st_created_at, t.updated_at AS st_updated_at
    FROM services s
    LEFT JOIN service_types t ON t.id = s.type_id
";

/// Map a joined row to a `ServiceWithType`
fn row_to_service_with_type(row: &SqliteRow) -> AppResult<ServiceWithType> {
    let id: String = row.try_get("id")?;
    let type_id: String = row.try_get("type_id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    let service = Service {
        id: parse_uuid(&id)?,
        nom: row.try_get("nom")?,
        description: row.try_get("description")?,
        prix: row.try_get("prix")?,
        type_id: parse_uuid(&type_id)?,
        image: row.try_get("image")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    };

    let service_type = match row.try_get::<Option<String>, _>("st_id")? {
        Some(st_id) => {
            let st_created: String = row.try_get("st_created_at")?;
            let st_updated: String = row.try_get("st_updated_at")?;
            Some(ServiceType {
                id: parse_uuid(&st_id)?,
                name: row.try_get("st_name")?,
                description: row.try_get("st_description")?,
                created_at: parse_timestamp(&st_created)?,
                updated_at: parse_timestamp(&st_updated)?,
            })
        }
        None => None,
    };

    Ok(ServiceWithType {
        service,
        service_type,
    })
}
