// ABOUTME: Route handlers for service types - public reads with usage counts, admin writes
// ABOUTME: A type still referenced by services refuses deletion with a conflict
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use crate::context::ServerResources;
use crate::database::service_types::{
    DeleteServiceTypeOutcome, ServiceTypeRequest, ServiceTypeWithCount,
};
use crate::errors::AppError;
use crate::middleware::AuthGate;
use crate::models::ServiceType;
use crate::permissions::{Action, Resource};
use crate::responses::ApiResponse;
use crate::routes::services::ServiceResponse;
use crate::validation::Validator;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Request body for creating or updating a service type
#[derive(Debug, Deserialize)]
pub struct ServiceTypeBody {
    /// Type name; unique across types
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
}

/// A service type with its usage count, as returned by the list endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceTypeResponse {
    /// The service type
    #[serde(flatten)]
    pub service_type: ServiceType,
    /// Number of services referencing this type
    pub services_count: i64,
}

impl From<ServiceTypeWithCount> for ServiceTypeResponse {
    fn from(item: ServiceTypeWithCount) -> Self {
        Self {
            service_type: item.service_type,
            services_count: item.services_count,
        }
    }
}

/// A service type with its services embedded, as returned by the show endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceTypeShowResponse {
    /// The service type
    #[serde(flatten)]
    pub service_type: ServiceType,
    /// The services referencing this type
    pub services: Vec<ServiceResponse>,
}

/// Service type routes handler
pub struct ServiceTypeRoutes;

impl ServiceTypeRoutes {
    /// Create all service type routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/service-types", get(Self::handle_list))
            .route("/api/service-types", post(Self::handle_create))
            .route("/api/service-types/:id", get(Self::handle_get))
            .route(
                "/api/service-types/:id",
                put(Self::handle_update).patch(Self::handle_update),
            )
            .route("/api/service-types/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    fn validate_body(body: &ServiceTypeBody) -> Result<ServiceTypeRequest, AppError> {
        let mut v = Validator::new();
        let name = v.required_string("name", body.name.as_deref(), 255);
        let description = v.optional_string("description", body.description.as_deref(), usize::MAX);
        v.finish()?;

        let Some(name) = name else {
            return Err(AppError::internal("validation passed with missing fields"));
        };
        Ok(ServiceTypeRequest { name, description })
    }

    /// Handle GET /api/service-types - public listing with usage counts
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::ServiceType, Action::List).await?;
        let types: Vec<ServiceTypeResponse> = resources
            .database
            .service_types()
            .list()
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(ApiResponse::data(types).into_response_with_status(StatusCode::OK))
    }

    /// Handle GET /api/service-types/:id - the type with its services embedded
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::ServiceType, Action::Show).await?;
        let service_type = resources
            .database
            .service_types()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Service type non trouvé."))?;
        let services: Vec<ServiceResponse> = resources
            .database
            .services()
            .list_for_type(id)
            .await?
            .into_iter()
            .map(|r| ServiceResponse::from_record(r, &resources.images))
            .collect();
        let payload = ServiceTypeShowResponse {
            service_type,
            services,
        };
        Ok(ApiResponse::data(payload).into_response_with_status(StatusCode::OK))
    }

    /// Handle POST /api/service-types - admin create; names are unique
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<ServiceTypeBody>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::ServiceType, Action::Create).await?;

        let request = Self::validate_body(&body)?;
        let service_type = resources.database.service_types().create(&request).await?;
        tracing::info!(service_type_id = %service_type.id, "service type created");

        Ok(
            ApiResponse::with_message("Type de service créé avec succès.", service_type)
                .into_response_with_status(StatusCode::CREATED),
        )
    }

    /// Handle PUT/PATCH /api/service-types/:id
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(body): Json<ServiceTypeBody>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::ServiceType, Action::Update).await?;

        let request = Self::validate_body(&body)?;
        let service_type = resources
            .database
            .service_types()
            .update(id, &request)
            .await?
            .ok_or_else(|| AppError::not_found("Service type non trouvé."))?;

        Ok(
            ApiResponse::with_message("Type de service mis à jour avec succès.", service_type)
                .into_response_with_status(StatusCode::OK),
        )
    }

    /// Handle DELETE /api/service-types/:id - refused while services remain
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::ServiceType, Action::Delete).await?;

        match resources.database.service_types().delete(id).await? {
            DeleteServiceTypeOutcome::Deleted => {
                Ok(ApiResponse::message("Type de service supprimé avec succès.")
                    .into_response_with_status(StatusCode::OK))
            }
            DeleteServiceTypeOutcome::NotFound => {
                Err(AppError::not_found("Service type non trouvé."))
            }
            DeleteServiceTypeOutcome::InUse => Err(AppError::conflict(
                "Impossible de supprimer ce type de service car il contient des services associés.",
            )),
        }
    }
}
