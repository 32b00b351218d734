// ABOUTME: Liveness route handlers for monitoring and deployment smoke checks
// ABOUTME: Both endpoints are public and touch no application state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the liveness routes
    pub fn routes() -> axum::Router {
        use axum::{routing::get, Json, Router};

        async fn health_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        }

        async fn test_handler() -> Json<serde_json::Value> {
            Json(serde_json::json!({
                "success": true,
                "message": "API is running"
            }))
        }

        Router::new()
            .route("/api/health", get(health_handler))
            .route("/api/test", get(test_handler))
    }
}
