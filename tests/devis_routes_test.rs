// ABOUTME: Integration tests for quote request (devis) routes
// ABOUTME: Covers public submission, admin triage, statistics, and strict transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use axum::http::StatusCode;
use common::spawn_app;
use serde_json::json;

fn devis_body() -> serde_json::Value {
    json!({
        "nom": "Karim Alaoui",
        "email": "karim@example.com",
        "telephone": "0612345678",
        "objet": "Rénovation cuisine",
        "message": "Je souhaite un devis pour une cuisine équipée.",
        "type_devis": "service",
    })
}

#[tokio::test]
async fn test_public_submission_starts_at_nouveau() {
    let app = spawn_app().await;

    let (status, body) = app.request("POST", "/api/devis", None, Some(devis_body())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Votre demande de devis a été envoyée avec succès! Nous vous contacterons bientôt."
    );
    assert_eq!(body["data"]["statut"], "nouveau");
    assert_eq!(body["data"]["type_devis"], "service");
}

#[tokio::test]
async fn test_submission_validation_failure_writes_nothing() {
    let app = spawn_app().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/devis",
            None,
            Some(json!({
                "nom": "",
                "email": "not-an-email",
                "type_devis": "rental",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    let errors = body["errors"].as_object().unwrap();
    assert!(errors.contains_key("nom"));
    assert!(errors.contains_key("email"));
    assert!(errors.contains_key("objet"));
    assert!(errors.contains_key("message"));
    assert_eq!(
        errors["type_devis"][0],
        "The selected type_devis is invalid."
    );

    // Nothing was persisted
    let token = app.admin_token().await;
    let (_, body) = app.request("GET", "/api/devis", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_requires_admin() {
    let app = spawn_app().await;

    let (status, _) = app.request("GET", "/api/devis", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user = app.user_token().await;
    let (status, _) = app.request("GET", "/api/devis", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.admin_token().await;
    let (status, _) = app.request("GET", "/api/devis", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_unknown_id_is_404() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let uri = format!("/api/devis/{}", uuid::Uuid::new_v4());
    let (status, body) = app.request("GET", &uri, Some(&admin), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Demande de devis non trouvée.");
}

#[tokio::test]
async fn test_default_mode_allows_any_status_transition() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (_, created) = app.request("POST", "/api/devis", None, Some(devis_body())).await;
    let id = created["data"]["id"].as_str().unwrap().to_owned();
    let uri = format!("/api/devis/{id}");

    // nouveau -> traite -> nouveau, both accepted without strict mode
    let (status, _) = app
        .request("PUT", &uri, Some(&admin), Some(json!({"statut": "traite"})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request("PUT", &uri, Some(&admin), Some(json!({"statut": "nouveau"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Demande de devis mise à jour avec succès.");
    assert_eq!(body["data"]["statut"], "nouveau");
}

#[tokio::test]
async fn test_strict_mode_rejects_backward_transition() {
    let app = common::spawn_app_with(|config| {
        config.strict_status_transitions = true;
    })
    .await;
    let admin = app.admin_token().await;

    let (_, created) = app.request("POST", "/api/devis", None, Some(devis_body())).await;
    let id = created["data"]["id"].as_str().unwrap().to_owned();
    let uri = format!("/api/devis/{id}");

    let (status, _) = app
        .request("PUT", &uri, Some(&admin), Some(json!({"statut": "en_cours"})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request("PUT", &uri, Some(&admin), Some(json!({"statut": "nouveau"})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        "Transition de statut invalide de 'en_cours' vers 'nouveau'."
    );

    // Forward transition still works, and a no-op restatement is accepted
    let (status, _) = app
        .request("PUT", &uri, Some(&admin), Some(json!({"statut": "en_cours"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .request("PUT", &uri, Some(&admin), Some(json!({"statut": "traite"})))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_partial_update_keeps_unspecified_fields() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (_, created) = app.request("POST", "/api/devis", None, Some(devis_body())).await;
    let id = created["data"]["id"].as_str().unwrap().to_owned();

    let (status, body) = app
        .request(
            "PATCH",
            &format!("/api/devis/{id}"),
            Some(&admin),
            Some(json!({"objet": "Rénovation salle de bain"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["objet"], "Rénovation salle de bain");
    assert_eq!(body["data"]["nom"], "Karim Alaoui");
    assert_eq!(body["data"]["email"], "karim@example.com");
    assert_eq!(body["data"]["statut"], "nouveau");
}

#[tokio::test]
async fn test_empty_telephone_clears_stored_value() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (_, created) = app.request("POST", "/api/devis", None, Some(devis_body())).await;
    let id = created["data"]["id"].as_str().unwrap().to_owned();
    let uri = format!("/api/devis/{id}");

    // An untouched patch keeps the number
    let (status, body) = app
        .request("PATCH", &uri, Some(&admin), Some(json!({"statut": "en_cours"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["telephone"], "0612345678");

    // An explicit empty string clears it
    let (status, body) = app
        .request("PATCH", &uri, Some(&admin), Some(json!({"telephone": ""})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["telephone"].is_null());
    assert_eq!(body["data"]["nom"], "Karim Alaoui");

    // And a new value can be set again afterwards
    let (status, body) = app
        .request("PATCH", &uri, Some(&admin), Some(json!({"telephone": "0700000000"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["telephone"], "0700000000");
}

#[tokio::test]
async fn test_statistics_exclude_annule() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let (_, created) = app.request("POST", "/api/devis", None, Some(devis_body())).await;
        ids.push(created["data"]["id"].as_str().unwrap().to_owned());
    }

    app.request(
        "PUT",
        &format!("/api/devis/{}", ids[0]),
        Some(&admin),
        Some(json!({"statut": "annule"})),
    )
    .await;
    app.request(
        "PUT",
        &format!("/api/devis/{}", ids[1]),
        Some(&admin),
        Some(json!({"statut": "en_cours"})),
    )
    .await;

    let (status, body) = app
        .request("GET", "/api/devis/statistics", Some(&admin), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let stats = &body["data"];
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["nouveau"], 1);
    assert_eq!(stats["en_cours"], 1);
    assert_eq!(stats["traite"], 0);
    // annule has no key; the breakdown sums to less than total
    assert!(stats.get("annule").is_none());
}

#[tokio::test]
async fn test_delete_then_404() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (_, created) = app.request("POST", "/api/devis", None, Some(devis_body())).await;
    let id = created["data"]["id"].as_str().unwrap().to_owned();
    let uri = format!("/api/devis/{id}");

    let (status, body) = app.request("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Demande de devis supprimée avec succès.");

    let (status, _) = app.request("DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
