// ABOUTME: Route handlers for product categories - public reads, admin writes
// ABOUTME: Deleting a category leaves its produits in place, matching the storefront's behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::middleware::AuthGate;
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

/// Request body for creating or renaming a category
#[derive(Debug, Deserialize)]
pub struct CategorieBody {
    /// Category name
    pub nom: Option<String>,
}

/// Product category routes handler
pub struct CategorieRoutes;

impl CategorieRoutes {
    /// Create all category routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/categories-produits", get(Self::handle_list))
            .route("/api/categories-produits", post(Self::handle_create))
            .route("/api/categories-produits/:id", get(Self::handle_get))
            .route(
                "/api/categories-produits/:id",
                put(Self::handle_update).patch(Self::handle_update),
            )
            .route("/api/categories-produits/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    fn validate_nom(body: &CategorieBody) -> Result<String, AppError> {
        let mut v = Validator::new();
        let nom = v.required_string("nom", body.nom.as_deref(), 255);
        v.finish()?;
        nom.ok_or_else(|| AppError::internal("validation passed with missing fields"))
    }

    /// Handle GET /api/categories-produits - public listing, ordered by name
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Categorie, Action::List).await?;
        let categories = resources.database.categories().list().await?;
        Ok(ApiResponse::data(categories).into_response_with_status(StatusCode::OK))
    }

    /// Handle GET /api/categories-produits/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Categorie, Action::Show).await?;
        let categorie = resources
            .database
            .categories()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Catégorie non trouvée."))?;
        Ok(ApiResponse::data(categorie).into_response_with_status(StatusCode::OK))
    }

    /// Handle POST /api/categories-produits - admin create
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CategorieBody>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Categorie, Action::Create).await?;

        let nom = Self::validate_nom(&body)?;
        let categorie = resources.database.categories().create(&nom).await?;
        tracing::info!(categorie_id = %categorie.id, "categorie created");

        Ok(ApiResponse::with_message("Catégorie créée avec succès.", categorie)
            .into_response_with_status(StatusCode::CREATED))
    }

    /// Handle PUT/PATCH /api/categories-produits/:id - rename
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        Json(body): Json<CategorieBody>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Categorie, Action::Update).await?;

        let nom = Self::validate_nom(&body)?;
        let categorie = resources
            .database
            .categories()
            .update(id, &nom)
            .await?
            .ok_or_else(|| AppError::not_found("Catégorie non trouvée."))?;

        Ok(ApiResponse::with_message("Catégorie mise à jour avec succès.", categorie)
            .into_response_with_status(StatusCode::OK))
    }

    /// Handle DELETE /api/categories-produits/:id
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Categorie, Action::Delete).await?;

        if !resources.database.categories().delete(id).await? {
            return Err(AppError::not_found("Catégorie non trouvée."));
        }

        Ok(ApiResponse::message("Catégorie supprimée avec succès.")
            .into_response_with_status(StatusCode::OK))
    }
}
