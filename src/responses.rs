// ABOUTME: Uniform JSON success envelope returned by every endpoint
// ABOUTME: Mirrors ErrorResponse so clients read one shape for success and failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};

/// Success envelope: `{ success, message, data }`.
/// `message` and `data` are omitted when absent, not serialized as null.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Data with no message; used by list and show endpoints
    #[must_use]
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Data plus a human-readable message; used by mutations
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    /// Convert to a response with an explicit status code
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl ApiResponse<()> {
    /// Message-only envelope; used by deletes
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_envelope() {
        let json = serde_json::to_string(&ApiResponse::data(vec![1, 2])).unwrap();
        assert_eq!(json, r#"{"success":true,"data":[1,2]}"#);
    }

    #[test]
    fn test_message_envelope_omits_data() {
        let json = serde_json::to_string(&ApiResponse::message("Supprimé.")).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("Supprimé."));
        assert!(!json.contains("\"data\""));
    }
}
