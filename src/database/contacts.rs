// ABOUTME: Database operations for contact messages - CRUD plus per-status statistics
// ABOUTME: Unlike devis, the statistics breakdown covers every status value
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use super::{parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{Contact, ContactStatus};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Validated input for creating a contact message
#[derive(Debug, Clone)]
pub struct CreateContactRequest {
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Optional phone number
    pub phone: Option<String>,
    /// Subject line
    pub subject: String,
    /// Free-form message body
    pub message: String,
}

/// Counts over the contacts table, covering all statuses
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ContactStatistics {
    /// All rows
    pub total: i64,
    /// Rows with status new
    pub new: i64,
    /// Rows with status in_progress
    pub in_progress: i64,
    /// Rows with status resolved
    pub resolved: i64,
}

/// Contact database operations manager
pub struct ContactManager {
    pool: SqlitePool,
}

impl ContactManager {
    /// Create a new contact manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a contact message; status always starts at `new`
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(&self, request: &CreateContactRequest) -> AppResult<Contact> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO contacts (
                id, name, email, phone, subject, message, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            ",
        )
        .bind(id.to_string())
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.subject)
        .bind(&request.message)
        .bind(ContactStatus::New.as_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create contact: {e}")))?;

        Ok(Contact {
            id,
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            subject: request.subject.clone(),
            message: request.message.clone(),
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a contact by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<Contact>> {
        let row = sqlx::query(
            r"
            SELECT id, name, email, phone, subject, message, status, created_at, updated_at
            FROM contacts
            WHERE id = $1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get contact: {e}")))?;

        row.map(|r| row_to_contact(&r)).transpose()
    }

    /// List all contacts, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn list(&self) -> AppResult<Vec<Contact>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, email, phone, subject, message, status, created_at, updated_at
            FROM contacts
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list contacts: {e}")))?;

        rows.iter().map(row_to_contact).collect()
    }

    /// Update the triage status. Returns `None` when the id does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn update_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> AppResult<Option<Contact>> {
        let result = sqlx::query(
            r"
            UPDATE contacts SET status = $1, updated_at = $2 WHERE id = $3
            ",
        )
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update contact: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    /// Permanently delete a contact; `false` when the id does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete contact: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Live counts over every status, computed at call time
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn statistics(&self) -> AppResult<ContactStatistics> {
        let row = sqlx::query(
            r"
            SELECT
                COUNT(*) AS total,
                SUM(CASE WHEN status = 'new' THEN 1 ELSE 0 END) AS new_count,
                SUM(CASE WHEN status = 'in_progress' THEN 1 ELSE 0 END) AS in_progress,
                SUM(CASE WHEN status = 'resolved' THEN 1 ELSE 0 END) AS resolved
            FROM contacts
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to compute contact statistics: {e}")))?;

        Ok(ContactStatistics {
            total: row.try_get("total")?,
            new: row.try_get::<Option<i64>, _>("new_count")?.unwrap_or(0),
            in_progress: row.try_get::<Option<i64>, _>("in_progress")?.unwrap_or(0),
            resolved: row.try_get::<Option<i64>, _>("resolved")?.unwrap_or(0),
        })
    }
}

/// Map a database row to a `Contact`
fn row_to_contact(row: &SqliteRow) -> AppResult<Contact> {
    let status_str: String = row.try_get("status")?;
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Contact {
        id: parse_uuid(&id)?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        subject: row.try_get("subject")?,
        message: row.try_get("message")?,
        status: ContactStatus::parse(&status_str)
            .ok_or_else(|| AppError::database(format!("Corrupt status '{status_str}'")))?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
