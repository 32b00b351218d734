// ABOUTME: Route handlers for catalog produits - public reads, admin writes with image upload
// ABOUTME: Writes are multipart/form-data; records are deleted before their image files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! Produit routes
//!
//! Reads are the public storefront; writes are admin-only and arrive as
//! multipart/form-data so an image can ride along. Stored image paths are
//! resolved to public URLs in every response.

use crate::context::ServerResources;
use crate::database::produits::{CreateProduitRequest, ProduitWithCategorie};
use crate::errors::AppError;
use crate::middleware::AuthGate;
use crate::models::CategorieProduit;
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

/// A produit as returned to clients, with the image path resolved to a URL
#[derive(Debug, Serialize, Deserialize)]
pub struct ProduitResponse {
    /// Unique identifier
    pub id: Uuid,
    /// Product name
    pub nom: String,
    /// Optional description
    pub description: Option<String>,
    /// Price
    pub prix: f64,
    /// Owning category id
    pub categorie_id: Uuid,
    /// Public image URL, when an image is stored
    pub image: Option<String>,
    /// The owning category, when it still exists
    pub categorie: Option<CategorieProduit>,
    /// Creation timestamp, RFC 3339
    pub created_at: String,
    /// Last update timestamp, RFC 3339
    pub updated_at: String,
}

impl ProduitResponse {
    fn from_record(record: ProduitWithCategorie, images: &ImageStore) -> Self {
        let produit = record.produit;
        Self {
            id: produit.id,
            nom: produit.nom,
            description: produit.description,
            prix: produit.prix,
            categorie_id: produit.categorie_id,
            image: produit.image.map(|path| images.url(&path)),
            categorie: record.categorie,
            created_at: produit.created_at.to_rfc3339(),
            updated_at: produit.updated_at.to_rfc3339(),
        }
    }
}

/// Produit routes handler
pub struct ProduitRoutes;

impl ProduitRoutes {
    /// Create all produit routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/produits", get(Self::handle_list))
            .route("/api/produits", post(Self::handle_create))
            .route("/api/produits/:id", get(Self::handle_get))
            .route(
                "/api/produits/:id",
                put(Self::handle_update).patch(Self::handle_update),
            )
            .route("/api/produits/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Validate the shared produit form fields, checking the category exists
    async fn validated_request(
        resources: &Arc<ServerResources>,
        form: &FormData,
    ) -> Result<CreateProduitRequest, AppError> {
        let mut v = Validator::new();
        let nom = v.required_string("nom", form.text("nom"), 255);
        let description = v.optional_string("description", form.text("description"), usize::MAX);
        let prix = match form.text("prix") {
            None | Some("") => {
                v.add("prix", "The prix field is required.");
                None
            }
            Some(_) => {
                let parsed = form.number("prix", &mut v);
                v.optional_non_negative("prix", parsed)
            }
        };
        let categorie_id = match form.text("categorie_id") {
            None | Some("") => {
                v.add("categorie_id", "The categorie_id field is required.");
                None
            }
            Some(_) => match form.uuid("categorie_id", &mut v) {
                Some(id) if resources.database.categories().exists(id).await? => Some(id),
                Some(_) => {
                    v.add("categorie_id", "The selected categorie_id is invalid.");
                    None
                }
                None => None,
            },
        };
        v.finish()?;

        let (Some(nom), Some(prix), Some(categorie_id)) = (nom, prix, categorie_id) else {
            return Err(AppError::internal("validation passed with missing fields"));
        };

        Ok(CreateProduitRequest {
            nom,
            description,
            prix,
            categorie_id,
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
                Ok(Some(resources.images.save("produits", upload).await?))
            }
            None => Ok(None),
        }
    }

    /// Handle GET /api/produits - public catalog listing
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Produit, Action::List).await?;
        let produits: Vec<ProduitResponse> = resources
            .database
            .produits()
            .list()
            .await?
            .into_iter()
            .map(|r| ProduitResponse::from_record(r, &resources.images))
            .collect();
        Ok(ApiResponse::data(produits).into_response_with_status(StatusCode::OK))
    }

    /// Handle GET /api/produits/:id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Produit, Action::Show).await?;
        let record = resources
            .database
            .produits()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Produit non trouvé."))?;
        Ok(ApiResponse::data(ProduitResponse::from_record(record, &resources.images))
            .into_response_with_status(StatusCode::OK))
    }

    /// Handle POST /api/produits - admin create with optional image
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        multipart: Multipart,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Produit, Action::Create).await?;

        let form = FormData::from_multipart(multipart).await?;
        // Image type/size failures must surface before anything is written
        if let Some(upload) = &form.image {
            ImageStore::validate(upload)?;
        }
        let request = Self::validated_request(&resources, &form).await?;
        let image = Self::store_image(&resources, &form).await?;
        let request = CreateProduitRequest { image, ..request };

        let produit = resources.database.produits().create(&request).await?;
        tracing::info!(produit_id = %produit.id, "produit created");

        let record = resources
            .database
            .produits()
            .get(produit.id)
            .await?
            .ok_or_else(|| AppError::internal("created produit vanished"))?;

        Ok(ApiResponse::with_message(
            "Produit créé avec succès.",
            ProduitResponse::from_record(record, &resources.images),
        )
        .into_response_with_status(StatusCode::CREATED))
    }

    /// Handle PUT/PATCH /api/produits/:id - full replace; a new image
    /// supersedes the old one, absence keeps it
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
        multipart: Multipart,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Produit, Action::Update).await?;

        let existing = resources
            .database
            .produits()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Produit non trouvé."))?;
        let old_image = existing.produit.image;

        let form = FormData::from_multipart(multipart).await?;
        if let Some(upload) = &form.image {
            ImageStore::validate(upload)?;
        }
        let request = Self::validated_request(&resources, &form).await?;

        let new_image = Self::store_image(&resources, &form).await?;
        let image = new_image.clone().or_else(|| old_image.clone());
        let request = CreateProduitRequest { image, ..request };

        let record = resources
            .database
            .produits()
            .update(id, &request)
            .await?
            .ok_or_else(|| AppError::not_found("Produit non trouvé."))?;

        // The record now points at the new file; the old one is expendable
        if new_image.is_some() {
            if let Some(old) = old_image {
                resources.images.delete(&old).await;
            }
        }

        Ok(ApiResponse::with_message(
            "Produit mis à jour avec succès.",
            ProduitResponse::from_record(record, &resources.images),
        )
        .into_response_with_status(StatusCode::OK))
    }

    /// Handle DELETE /api/produits/:id - record first, then best-effort file
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        AuthGate::authorize(&resources, &headers, Resource::Produit, Action::Delete).await?;

        let existing = resources
            .database
            .produits()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Produit non trouvé."))?;

        if !resources.database.produits().delete(id).await? {
            return Err(AppError::not_found("Produit non trouvé."));
        }

        if let Some(image) = existing.produit.image {
            resources.images.delete(&image).await;
        }

        Ok(ApiResponse::message("Produit supprimé avec succès.")
            .into_response_with_status(StatusCode::OK))
    }
}
