// ABOUTME: Shared test utilities - in-memory app construction and request helpers
// ABOUTME: Provides admin/user token setup and JSON/multipart request plumbing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Shared test utilities for `usa_home_server`
//!
//! Builds a full application router over an in-memory database and a
//! temporary upload directory, and provides request helpers so tests read
//! as scenario scripts.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use usa_home_server::{
    config::environment::{AuthConfig, DatabaseConfig, ServerConfig, StorageConfig},
    context::ServerResources,
    database::Database,
    server::build_router,
};

pub const ADMIN_EMAIL: &str = "admin@usahome.test";

/// A fully wired application over throwaway state
pub struct TestApp {
    pub router: Router,
    pub resources: Arc<ServerResources>,
    // Held so the upload directory outlives the test
    _upload_dir: tempfile::TempDir,
}

/// Test configuration: in-memory database, temp upload dir, fast bcrypt
fn test_config(upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database: DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "test-jwt-secret".into(),
            jwt_expiry_hours: 24,
            bcrypt_cost: 4,
            admin_email: Some(ADMIN_EMAIL.into()),
        },
        storage: StorageConfig {
            upload_dir,
            public_base_url: "http://localhost:8081".into(),
        },
        cors_allowed_origins: String::new(),
        strict_status_transitions: false,
    }
}

/// Build an app with the default test configuration
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Build an app, letting the test adjust the configuration first
pub async fn spawn_app_with(customize: impl FnOnce(&mut ServerConfig)) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("create temp upload dir");
    let mut config = test_config(upload_dir.path().to_path_buf());
    customize(&mut config);

    let database = Database::new(&config.database.url, config.database.max_connections)
        .await
        .expect("connect in-memory database");
    database.migrate().await.expect("run migrations");

    let resources = Arc::new(ServerResources::new(database, config));
    TestApp {
        router: build_router(resources.clone()),
        resources,
        _upload_dir: upload_dir,
    }
}

impl TestApp {
    /// Send a JSON request; returns status and parsed body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(value) => builder
                .header("content-type", "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Send a multipart/form-data request built from text fields and an
    /// optional image part
    pub async fn request_multipart(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        fields: &[(&str, &str)],
        image: Option<(&str, &str, &[u8])>,
    ) -> (StatusCode, Value) {
        const BOUNDARY: &str = "usa-home-test-boundary";

        let mut body: Vec<u8> = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, content_type, bytes)) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let response = self
            .router
            .clone()
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Fetch a raw (non-JSON) resource, e.g. a stored image
    pub async fn get_raw(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    /// Register an account and return its bearer token
    pub async fn register(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/register",
                None,
                Some(json!({
                    "name": "Test User",
                    "email": email,
                    "password": password,
                    "password_confirmation": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["data"]["token"].as_str().unwrap().to_owned()
    }

    /// Register the configured admin account and return its token
    pub async fn admin_token(&self) -> String {
        self.register(ADMIN_EMAIL, "admin-password").await
    }

    /// Register a regular (non-admin) account and return its token
    pub async fn user_token(&self) -> String {
        self.register("visitor@usahome.test", "visitor-password")
            .await
    }
}

/// A minimal valid PNG-ish payload; the server validates type and size,
/// not image contents
pub fn png_bytes() -> Vec<u8> {
    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4]
}
