// ABOUTME: Route handlers for catalog services - public reads, admin writes with image upload
// ABOUTME: Price is optional; absence means the service is quoted on request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use crate::context::ServerResources;
use crate::database::services::{CreateServiceRequest, ServiceWithType};
use crate::errors::AppError;
use crate::middleware::AuthGate;
use crate::models::ServiceType;
use crate::permissions::{Action, Resource};
use crate::responses::ApiResponse;
use crate::routes::forms::FormData;
use crate::storage::ImageStore;
use crate::validation::Validator;
use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A service as returned to clients, with the image path resolved to a URL
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceResponse {
    /// Unique identifier
    pub id: Uuid,
    /// Service name
    pub nom: String,
    /// Optional description
    pub description: Option<String>,
    /// Price; absent means "quote on request"
    pub prix: Option<f64>,
    /// Owning service type id
    pub type_id: Uuid,
    /// Public image URL, when an image is stored
    pub image: Option<String>,
    /// The owning service type
    pub service_type: Option<ServiceType>,
    /// Creation timestamp, RFC 3339
    pub created_at: String,
    /// Last update timestamp, RFC 3339
    pub updated_at: String,
}

impl ServiceResponse {
    pub(crate) fn from_record(record: ServiceWithType, images: &ImageStore) -> Self {
        let service = record.service;
        Self {
            id: service.id,
            nom: service.nom,
            description: service.description,
            prix: service.prix,
            type_id: service.type_id,
            image: service.image.map(|path| images.url(&path)),
            service_type: record.service_type,
            created_at: service.created_at.to_rfc3339(),
            updated_at: service.updated_at.to_rfc3339(),
        }
    }
}

/// Service routes handler
pub struct ServiceRoutes;

impl ServiceRoutes {
    /// Create all service routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/services", get(Self::handle_list))
            .route("/api/services", post(Self::handle_create))
            .route("/api/services/:id", get(Self::handle_get))
            .route(
                "/api/services/:id",
                put(Self::handle_update).patch(Self::handle_update),
            )
            .route("/api/services/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Validate the shared service form fields, checking the type exists
    async fn validated_request(
        resources: &Arc<ServerResources>,
        form: &FormData,
    ) -> Result<CreateServiceRequest, AppError> {
        let mut v = Validator::new();
        let nom = v.required_string("nom", form.text("nom"), 255);
        let description = v.optional_string("description", form.text("description"), usize::MAX);
        let parsed_prix = form.number("prix", &mut v);
        let prix = v.optional_non_negative("prix", parsed_prix);
        let type_id = match form.text("type_id") {
            None | Some("") => {
                v.add("type_id", "The type_id field is required.");
                None
            }
            Some(_) => match form.uuid("type_id", &mut v) {
                Some(id) if resources.database.service_types().exists(id).await? => Some(id),
                Some(_) => {
                    v.add("type_id", "The selected type_id is invalid.");
                    None
                }
                None => None,
            },
        };
        v.finish()?;

        let (Some(nom), Some(type_id)) = (nom, type_id) else {
            return Err(AppError::internal("validation passed with missing fields"));
        };

        Ok(CreateServiceRequest {
            nom,
            description,
            prix,
            type_id,
            image: None,
        })
    }

    /// Validate and store an uploaded image, returning its relative path
    async fn store_image(
        resources: &Arc<ServerResources>,
        form: &FormData,
    ) -> Result<Option<String>, AppError> {
        match &form.image {
            Some(upload) => {
                ImageStore::validate(upload)?;
                Ok(Some(resources.images.save("services", upload).await?))
            }
            None => Ok(None),
        }
    }

    /// Handle GET /api/services - public catalog listing
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Service, Action::List).await?;
        let services: Vec<ServiceResponse> = resources
            .database
            .services()
            .list()
            .await?
            .into_iter()
            .map(|r| ServiceResponse::from_record(r, &resources.images))
            .collect();
        Ok(ApiResponse::data(services).into_response_with_status(StatusCode::OK))
    }

    /// Handle GET /api/services/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Service, Action::Show).await?;
        let record = resources
            .database
            .services()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Service non trouvé."))?;
        Ok(ApiResponse::data(ServiceResponse::from_record(record, &resources.images))
            .into_response_with_status(StatusCode::OK))
    }

    /// Handle POST /api/services - admin create with optional image
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        multipart: Multipart,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Service, Action::Create).await?;

        let form = FormData::from_multipart(multipart).await?;
        if let Some(upload) = &form.image {
            ImageStore::validate(upload)?;
        }
        let request = Self::validated_request(&resources, &form).await?;
        let image = Self::store_image(&resources, &form).await?;
        let request = CreateServiceRequest { image, ..request };

        let service = resources.database.services().create(&request).await?;
        tracing::info!(service_id = %service.id, "service created");

        let record = resources
            .database
            .services()
            .get(service.id)
            .await?
            .ok_or_else(|| AppError::internal("created service vanished"))?;

        Ok(ApiResponse::with_message(
            "Service créé avec succès.",
            ServiceResponse::from_record(record, &resources.images),
        )
        .into_response_with_status(StatusCode::CREATED))
    }

    /// Handle PUT/PATCH /api/services/:id - full replace; a new image
    /// supersedes the old one, absence keeps it
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        multipart: Multipart,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Service, Action::Update).await?;

        let existing = resources
            .database
            .services()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Service non trouvé."))?;
        let old_image = existing.service.image;

        let form = FormData::from_multipart(multipart).await?;
        if let Some(upload) = &form.image {
            ImageStore::validate(upload)?;
        }
        let request = Self::validated_request(&resources, &form).await?;

        let new_image = Self::store_image(&resources, &form).await?;
        let image = new_image.clone().or_else(|| old_image.clone());
        let request = CreateServiceRequest { image, ..request };

        let record = resources
            .database
            .services()
            .update(id, &request)
            .await?
            .ok_or_else(|| AppError::not_found("Service non trouvé."))?;

        if new_image.is_some() {
            if let Some(old) = old_image {
                resources.images.delete(&old).await;
            }
        }

        Ok(ApiResponse::with_message(
            "Service mis à jour avec succès.",
            ServiceResponse::from_record(record, &resources.images),
        )
        .into_response_with_status(StatusCode::OK))
    }

    /// Handle DELETE /api/services/:id - record first, then best-effort file
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Service, Action::Delete).await?;

        let existing = resources
            .database
            .services()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Service non trouvé."))?;

        if !resources.database.services().delete(id).await? {
            return Err(AppError::not_found("Service non trouvé."));
        }

        if let Some(image) = existing.service.image {
            resources.images.delete(&image).await;
        }

        Ok(ApiResponse::message("Service supprimé avec succès.")
            .into_response_with_status(StatusCode::OK))
    }
}
