// ABOUTME: Database operations for user accounts - registration lookup and role storage
// ABOUTME: Emails are unique; duplicate registration surfaces as a conflict
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use super::{parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserRole};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

/// Validated input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    /// Login email
    pub email: String,
    /// Bcrypt hash of the password
    pub password_hash: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// Assigned role
    pub role: UserRole,
}

/// User database operations manager
pub struct UserManager {
    pool: SqlitePool,
}

impl UserManager {
    /// Create a new user manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user account
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the email is already registered
    pub async fn create(&self, request: &CreateUserRequest) -> AppResult<User> {
        if self.get_by_email(&request.email).await?.is_some() {
            return Err(AppError::conflict("Cet email est déjà utilisé."));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO users (id, email, password_hash, display_name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ",
        )
        .bind(id.to_string())
        .bind(&request.email)
        .bind(&request.password_hash)
        .bind(&request.display_name)
        .bind(request.role.as_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;

        Ok(User {
            id,
            email: request.email.clone(),
            password_hash: request.password_hash.clone(),
            display_name: request.display_name.clone(),
            role: request.role,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("{USER_SELECT} WHERE id = $1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by login email
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("{USER_SELECT} WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.map(|r| row_to_user(&r)).transpose()
    }
}

/// User columns for row mapping
const USER_SELECT: &str =
    "SELECT id, email, password_hash, display_name, role, created_at, updated_at FROM users";

/// Map a database row to a `User`
fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let id: String = row.try_get("id")?;
    let role: String = row.try_get("role")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(User {
        id: parse_uuid(&id)?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        display_name: row.try_get("display_name")?,
        role: UserRole::parse(&role),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
