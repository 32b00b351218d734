// ABOUTME: Unified error handling with standard error codes and HTTP response formatting
// ABOUTME: Defines AppError, ErrorCode, and the JSON error envelope used by every endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! # Unified Error Handling System
//!
//! Centralized error handling for the USA Home server. Defines standard
//! error types, error codes, and HTTP response formatting so all endpoints
//! surface failures through one consistent envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    #[serde(rename = "AUTH_EXPIRED")]
    AuthExpired = 1002,
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1003,

    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "VALIDATION_FAILED")]
    ValidationFailed = 3001,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    #[serde(rename = "RESOURCE_CONFLICT")]
    ResourceConflict = 4001,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            Self::InvalidInput => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied => StatusCode::FORBIDDEN,

            // 404 Not Found
            Self::ResourceNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::ResourceConflict => StatusCode::CONFLICT,

            // 422 Unprocessable Entity
            Self::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::StorageError
            | Self::SerializationError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::AuthExpired => "The authentication token has expired",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::InvalidInput => "The provided input is invalid",
            Self::ValidationFailed => "One or more fields failed validation",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceConflict => "The request conflicts with the current resource state",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Per-field validation messages, ordered by field name
pub type FieldErrorMap = BTreeMap<String, Vec<String>>;

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Per-field validation messages (only for `ValidationFailed`)
    pub field_errors: Option<FieldErrorMap>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field_errors: None,
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience functions for creating common errors
impl AppError {
    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Invalid authentication
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authentication expired
    #[must_use]
    pub fn auth_expired() -> Self {
        Self::new(ErrorCode::AuthExpired, "Authentication token has expired")
    }

    /// Admin privileges missing
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Resource not found
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, message)
    }

    /// Conflict with the current resource state
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceConflict, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Validation failure with a per-field error map
    #[must_use]
    pub fn validation(field_errors: FieldErrorMap) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: "Validation failed".into(),
            field_errors: Some(field_errors),
            source: None,
        }
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

/// HTTP error response envelope, mirroring `ApiResponse` with `success = false`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrorMap>,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            success: false,
            message: error.message.clone(),
            errors: error.field_errors.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();

        // Internal failure details go to the log, never to the client
        let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = ?self.code, "internal error: {}", self.message);
            ErrorResponse {
                success: false,
                message: "Une erreur interne est survenue.".into(),
                errors: None,
            }
        } else {
            ErrorResponse::from(&self)
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        Self::database(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(ErrorCode::InternalError, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(
            ErrorCode::AuthRequired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::ResourceNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::ResourceConflict.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_error_carries_field_map() {
        let mut fields = FieldErrorMap::new();
        fields.insert("email".into(), vec!["The email field is required.".into()]);
        let error = AppError::validation(fields);

        assert_eq!(error.code, ErrorCode::ValidationFailed);
        let response = ErrorResponse::from(&error);
        assert!(!response.success);
        assert!(response.errors.unwrap().contains_key("email"));
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::not_found("Demande de devis non trouvée.");
        let json = serde_json::to_string(&ErrorResponse::from(&error)).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("non trouvée"));
        // No errors key when there is no field map
        assert!(!json.contains("\"errors\""));
    }
}
