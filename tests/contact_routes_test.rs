// ABOUTME: Integration tests for contact message routes
// ABOUTME: Covers public submission, status triage, statistics, and deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::http::StatusCode;
use common::spawn_app;
use serde_json::json;

fn contact_body() -> serde_json::Value {
    json!({
        "name": "Sara Bennis",
        "email": "sara@example.com",
        "phone": "0522334455",
        "subject": "Question sur vos services",
        "message": "Proposez-vous des installations à Casablanca ?",
    })
}

#[tokio::test]
async fn test_public_submission_starts_at_new() {
    let app = spawn_app().await;

    let (status, body) = app
        .request("POST", "/api/contacts", None, Some(contact_body()))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "new");
    assert_eq!(body["data"]["name"], "Sara Bennis");
}

#[tokio::test]
async fn test_submission_validation_collects_all_failures() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/contacts",
            None,
            Some(json!({
                "email": "broken",
                "phone": "0".repeat(21),
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors["name"][0], "The name field is required.");
    assert_eq!(errors["email"][0], "The email must be a valid email address.");
    assert_eq!(
        errors["phone"][0],
        "The phone may not be greater than 20 characters."
    );
    assert!(errors.contains_key("subject"));
    assert!(errors.contains_key("message"));
}

#[tokio::test]
async fn test_status_patch_accepts_only_known_values() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (_, created) = app
        .request("POST", "/api/contacts", None, Some(contact_body()))
        .await;
    let id = created["data"]["id"].as_str().unwrap().to_owned();
    let uri = format!("/api/contacts/{id}");

    let (status, body) = app
        .request("PATCH", &uri, Some(&admin), Some(json!({"status": "closed"})))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["status"][0], "The selected status is invalid.");

    let (status, body) = app
        .request("PATCH", &uri, Some(&admin), Some(json!({"status": "resolved"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "resolved");
}

#[tokio::test]
async fn test_statistics_cover_every_status() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let (_, created) = app
            .request("POST", "/api/contacts", None, Some(contact_body()))
            .await;
        ids.push(created["data"]["id"].as_str().unwrap().to_owned());
    }

    app.request(
        "PATCH",
        &format!("/api/contacts/{}", ids[0]),
        Some(&admin),
        Some(json!({"status": "in_progress"})),
    )
    .await;
    app.request(
        "PATCH",
        &format!("/api/contacts/{}", ids[1]),
        Some(&admin),
        Some(json!({"status": "resolved"})),
    )
    .await;

    let (status, body) = app
        .request("GET", "/api/contacts/statistics", Some(&admin), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"];
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["new"], 1);
    assert_eq!(stats["in_progress"], 1);
    assert_eq!(stats["resolved"], 1);
}

#[tokio::test]
async fn test_triage_endpoints_require_admin() {
    let app = spawn_app().await;

    let (status, _) = app.request("GET", "/api/contacts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user = app.user_token().await;
    let (status, _) = app
        .request("GET", "/api/contacts/statistics", Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_then_404() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (_, created) = app
        .request("POST", "/api/contacts", None, Some(contact_body()))
        .await;
    let id = created["data"]["id"].as_str().unwrap().to_owned();
    let uri = format!("/api/contacts/{id}");

    let (status, body) = app.request("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Contact supprimé avec succès.");

    let (status, body) = app.request("GET", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Contact non trouvé.");
}
