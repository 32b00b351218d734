// ABOUTME: Route handlers for quote requests (devis) - public submission, admin triage
// ABOUTME: Status transitions are permissive unless strict mode is configured
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! Devis routes
//!
//! Submission is public; listing, triage, statistics, and deletion are
//! admin-only. The statistics breakdown excludes `annule` on purpose, so
//! the three status counts may not sum to `total`.

use crate::context::ServerResources;
use crate::database::devis::{CreateDevisRequest, UpdateDevisRequest};
use crate::errors::AppError;
use crate::middleware::AuthGate;
use crate::models::{DevisStatus, DevisType};
use crate::permissions::{Action, Resource};
use crate::responses::ApiResponse;
use crate::validation::Validator;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Request body for submitting a devis
#[derive(Debug, Deserialize)]
pub struct CreateDevisBody {
    /// Submitter name
    pub nom: Option<String>,
    /// Submitter email
    pub email: Option<String>,
    /// Optional phone number
    pub telephone: Option<String>,
    /// Subject line
    pub objet: Option<String>,
    /// Free-form request body
    pub message: Option<String>,
    /// Requested quote type
    pub type_devis: Option<String>,
}

/// Request body for the admin patch; absent fields keep their stored value
#[derive(Debug, Deserialize, Default)]
pub struct UpdateDevisBody {
    /// New status (if provided)
    pub statut: Option<String>,
    /// New name (if provided)
    pub nom: Option<String>,
    /// New email (if provided)
    pub email: Option<String>,
    /// New phone; an empty string clears the stored value
    pub telephone: Option<String>,
    /// New subject (if provided)
    pub objet: Option<String>,
    /// New message (if provided)
    pub message: Option<String>,
    /// New quote type (if provided)
    pub type_devis: Option<String>,
}

/// Devis routes handler
pub struct DevisRoutes;

impl DevisRoutes {
    /// Create all devis routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/devis", post(Self::handle_create))
            .route("/api/devis", get(Self::handle_list))
            .route("/api/devis/statistics", get(Self::handle_statistics))
            .route("/api/devis/:id", get(Self::handle_get))
            .route(
                "/api/devis/:id",
                put(Self::handle_update).patch(Self::handle_update),
            )
            .route("/api/devis/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle POST /api/devis - public quote submission
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateDevisBody>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Devis, Action::Create).await?;

        let mut v = Validator::new();
        let nom = v.required_string("nom", body.nom.as_deref(), 255);
        let email = v.required_email("email", body.email.as_deref(), 255);
        let telephone = v.optional_string("telephone", body.telephone.as_deref(), 20);
        let objet = v.required_string("objet", body.objet.as_deref(), 255);
        let message = v.required_string("message", body.message.as_deref(), usize::MAX);
        let type_devis = v.required_one_of("type_devis", body.type_devis.as_deref(), DevisType::parse);
        v.finish()?;

        let (Some(nom), Some(email), Some(objet), Some(message), Some(type_devis)) =
            (nom, email, objet, message, type_devis)
        else {
            return Err(AppError::internal("validation passed with missing fields"));
        };

        let devis = resources
            .database
            .devis()
            .create(&CreateDevisRequest {
                nom,
                email,
                telephone,
                objet,
                message,
                type_devis,
            })
            .await?;

        tracing::info!(devis_id = %devis.id, "devis submitted");

        Ok(ApiResponse::with_message(
            "Votre demande de devis a été envoyée avec succès! Nous vous contacterons bientôt.",
            devis,
        )
        .into_response_with_status(StatusCode::CREATED))
    }

    /// Handle GET /api/devis - list all, newest first
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Devis, Action::List).await?;
        let devis = resources.database.devis().list().await?;
        Ok(ApiResponse::data(devis).into_response_with_status(StatusCode::OK))
    }

    /// Handle GET /api/devis/statistics - live dashboard counts
    async fn handle_statistics(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Devis, Action::Statistics).await?;
        let stats = resources.database.devis().statistics().await?;
        Ok(ApiResponse::data(stats).into_response_with_status(StatusCode::OK))
    }

    /// Handle GET /api/devis/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Devis, Action::Show).await?;
        let devis = resources
            .database
            .devis()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Demande de devis non trouvée."))?;
        Ok(ApiResponse::data(devis).into_response_with_status(StatusCode::OK))
    }

    /// Handle PUT/PATCH /api/devis/:id - partial admin patch
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(body): Json<UpdateDevisBody>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Devis, Action::Update).await?;

        let mut v = Validator::new();
        let statut = v.optional_one_of("statut", body.statut.as_deref(), DevisStatus::parse);
        let nom = v.optional_string("nom", body.nom.as_deref(), 255);
        let email = match body.email.as_deref() {
            None | Some("") => None,
            some => v.required_email("email", some, 255),
        };
        let telephone = match body.telephone.as_deref() {
            None => None,
            // An explicit empty string clears the stored number
            Some("") => Some(None),
            some => v.optional_string("telephone", some, 20).map(Some),
        };
        let objet = v.optional_string("objet", body.objet.as_deref(), 255);
        let message = v.optional_string("message", body.message.as_deref(), usize::MAX);
        let type_devis = v.optional_one_of("type_devis", body.type_devis.as_deref(), DevisType::parse);
        v.finish()?;

        let manager = resources.database.devis();

        if let Some(next) = statut {
            if resources.config.strict_status_transitions {
                let existing = manager
                    .get(id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Demande de devis non trouvée."))?;
                if next != existing.statut && !existing.statut.can_transition_to(next) {
                    return Err(AppError::conflict(format!(
                        "Transition de statut invalide de '{}' vers '{}'.",
                        existing.statut.as_str(),
                        next.as_str()
                    )));
                }
            }
        }

        let devis = manager
            .update(
                id,
                &UpdateDevisRequest {
                    statut,
                    nom,
                    email,
                    telephone,
                    objet,
                    message,
                    type_devis,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Demande de devis non trouvée."))?;

        Ok(
            ApiResponse::with_message("Demande de devis mise à jour avec succès.", devis)
                .into_response_with_status(StatusCode::OK),
        )
    }

    /// Handle DELETE /api/devis/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Devis, Action::Delete).await?;

        if !resources.database.devis().delete(id).await? {
            return Err(AppError::not_found("Demande de devis non trouvée."));
        }

        Ok(ApiResponse::message("Demande de devis supprimée avec succès.")
            .into_response_with_status(StatusCode::OK))
    }
}
