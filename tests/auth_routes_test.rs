// ABOUTME: Integration tests for registration, login, profile, and logout routes
// ABOUTME: Covers role assignment via ADMIN_EMAIL and token-based access control
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::http::StatusCode;
use common::{spawn_app, ADMIN_EMAIL};
use serde_json::json;

#[tokio::test]
async fn test_register_issues_working_token() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({
                "name": "Karim",
                "email": "karim@example.com",
                "password": "long-enough-password",
                "password_confirmation": "long-enough-password",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Inscription réussie.");
    assert_eq!(body["data"]["user"]["role"], "user");
    // The password hash never leaves the server
    assert!(body["data"]["user"].get("password_hash").is_none());

    let token = body["data"]["token"].as_str().unwrap();
    let (status, body) = app.request("GET", "/api/user", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "karim@example.com");
}

#[tokio::test]
async fn test_admin_email_gets_admin_role() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({
                "email": ADMIN_EMAIL,
                "password": "admin-password",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["role"], "admin");
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({
                "email": "not-an-email",
                "password": "short",
                "password_confirmation": "short",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors["email"][0], "The email must be a valid email address.");
    assert_eq!(
        errors["password"][0],
        "The password must be at least 8 characters."
    );
}

#[tokio::test]
async fn test_register_rejects_mismatched_confirmation() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({
                "email": "karim@example.com",
                "password": "long-enough-password",
                "password_confirmation": "different-password",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["password"][0],
        "The password confirmation does not match."
    );
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = spawn_app().await;
    app.register("karim@example.com", "long-enough-password")
        .await;

    let (status, body) = app
        .request(
            "POST",
            "/api/register",
            None,
            Some(json!({
                "email": "karim@example.com",
                "password": "long-enough-password",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Cet email est déjà utilisé.");
}

#[tokio::test]
async fn test_login_and_wrong_password() {
    let app = spawn_app().await;
    app.register("karim@example.com", "long-enough-password")
        .await;

    let (status, body) = app
        .request(
            "POST",
            "/api/login",
            None,
            Some(json!({
                "email": "karim@example.com",
                "password": "long-enough-password",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Connexion réussie.");
    assert!(body["data"]["token"].as_str().is_some());

    let (status, body) = app
        .request(
            "POST",
            "/api/login",
            None,
            Some(json!({
                "email": "karim@example.com",
                "password": "wrong-password",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Identifiants invalides.");

    // Unknown email gets the same message as a wrong password
    let (status, body) = app
        .request(
            "POST",
            "/api/login",
            None,
            Some(json!({
                "email": "nobody@example.com",
                "password": "whatever-password",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Identifiants invalides.");
}

#[tokio::test]
async fn test_profile_and_logout_require_token() {
    let app = spawn_app().await;

    let (status, _) = app.request("GET", "/api/user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request("POST", "/api/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.user_token().await;
    let (status, body) = app.request("POST", "/api/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Déconnexion réussie.");
}

#[tokio::test]
async fn test_forged_token_rejected() {
    let app = spawn_app().await;

    let (status, _) = app
        .request("GET", "/api/user", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
