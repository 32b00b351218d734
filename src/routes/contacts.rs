// ABOUTME: Route handlers for contact messages - public submission, admin triage
// ABOUTME: The only admin mutation is the status patch; bodies are never edited
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! Contact routes
//!
//! Structurally a sibling of the devis routes, but the statistics cover
//! every status and update only ever touches the triage status.

use crate::context::ServerResources;
use crate::database::contacts::CreateContactRequest;
use crate::errors::AppError;
use crate::middleware::AuthGate;
use crate::models::ContactStatus;
use crate::permissions::{Action, Resource};
use crate::responses::ApiResponse;
use crate::validation::Validator;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Request body for submitting a contact message
#[derive(Debug, Deserialize)]
pub struct CreateContactBody {
    /// Sender name
    pub name: Option<String>,
    /// Sender email
    pub email: Option<String>,
    /// Optional phone number
    pub phone: Option<String>,
    /// Subject line
    pub subject: Option<String>,
    /// Message body
    pub message: Option<String>,
}

/// Request body for the triage status patch
#[derive(Debug, Deserialize)]
pub struct UpdateContactBody {
    /// New triage status
    pub status: Option<String>,
}

/// Contact routes handler
pub struct ContactRoutes;

impl ContactRoutes {
    /// Create all contact routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/contacts", post(Self::handle_create))
            .route("/api/contacts", get(Self::handle_list))
            .route("/api/contacts/statistics", get(Self::handle_statistics))
            .route("/api/contacts/:id", get(Self::handle_get))
            .route("/api/contacts/:id", patch(Self::handle_update))
            .route("/api/contacts/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle POST /api/contacts - public message submission
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateContactBody>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Contact, Action::Create).await?;

        let mut v = Validator::new();
        let name = v.required_string("name", body.name.as_deref(), 255);
        let email = v.required_email("email", body.email.as_deref(), 255);
        let phone = v.optional_string("phone", body.phone.as_deref(), 20);
        let subject = v.required_string("subject", body.subject.as_deref(), 255);
        let message = v.required_string("message", body.message.as_deref(), usize::MAX);
        v.finish()?;

        let (Some(name), Some(email), Some(subject), Some(message)) =
            (name, email, subject, message)
        else {
            return Err(AppError::internal("validation passed with missing fields"));
        };

        let contact = resources
            .database
            .contacts()
            .create(&CreateContactRequest {
                name,
                email,
                phone,
                subject,
                message,
            })
            .await?;

        tracing::info!(contact_id = %contact.id, "contact message submitted");

        Ok(ApiResponse::with_message(
            "Votre message a été envoyé avec succès! Nous vous répondrons bientôt.",
            contact,
        )
        .into_response_with_status(StatusCode::CREATED))
    }

    /// Handle GET /api/contacts - list all, newest first
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Contact, Action::List).await?;
        let contacts = resources.database.contacts().list().await?;
        Ok(ApiResponse::data(contacts).into_response_with_status(StatusCode::OK))
    }

    /// Handle GET /api/contacts/statistics - counts over every status
    async fn handle_statistics(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Contact, Action::Statistics).await?;
        let stats = resources.database.contacts().statistics().await?;
        Ok(ApiResponse::data(stats).into_response_with_status(StatusCode::OK))
    }

    /// Handle GET /api/contacts/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Contact, Action::Show).await?;
        let contact = resources
            .database
            .contacts()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Contact non trouvé."))?;
        Ok(ApiResponse::data(contact).into_response_with_status(StatusCode::OK))
    }

    /// Handle PATCH /api/contacts/:id - triage status only
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(body): Json<UpdateContactBody>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Contact, Action::Update).await?;

        let mut v = Validator::new();
        let status = v.required_one_of("status", body.status.as_deref(), ContactStatus::parse);
        v.finish()?;

        let Some(status) = status else {
            return Err(AppError::internal("validation passed with missing fields"));
        };

        let contact = resources
            .database
            .contacts()
            .update_status(id, status)
            .await?
            .ok_or_else(|| AppError::not_found("Contact non trouvé."))?;

        Ok(ApiResponse::with_message("Contact mis à jour avec succès.", contact)
            .into_response_with_status(StatusCode::OK))
    }

    /// Handle DELETE /api/contacts/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Contact, Action::Delete).await?;

        if !resources.database.contacts().delete(id).await? {
            return Err(AppError::not_found("Contact non trouvé."));
        }

        Ok(ApiResponse::message("Contact supprimé avec succès.")
            .into_response_with_status(StatusCode::OK))
    }
}
