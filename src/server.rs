// ABOUTME: Router assembly and HTTP server lifecycle - layers, static files, startup sweep
// ABOUTME: Merges one sub-router per resource over shared Arc<ServerResources>
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! HTTP server
//!
//! `build_router` merges every route module, serves uploaded images under
//! `/storage`, and wraps the result in tracing, CORS, and a body limit that
//! leaves headroom over the 2 MB image cap. `serve` binds the listener and
//! runs until shutdown.

use crate::context::ServerResources;
use crate::errors::AppResult;
use crate::middleware::setup_cors;
use crate::routes::{
    AuthRoutes, CategorieRoutes, ContactRoutes, DevisRoutes, HealthRoutes, ProduitRoutes,
    ServiceRoutes, ServiceTypeRoutes,
};
use axum::{extract::DefaultBodyLimit, Router};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Request body ceiling: the 2 MB image cap plus form-field headroom
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Assemble the full application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config.cors_allowed_origins);
    let storage = ServeDir::new(resources.images.root());

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(DevisRoutes::routes(resources.clone()))
        .merge(ContactRoutes::routes(resources.clone()))
        .merge(ProduitRoutes::routes(resources.clone()))
        .merge(ServiceRoutes::routes(resources.clone()))
        .merge(CategorieRoutes::routes(resources.clone()))
        .merge(ServiceTypeRoutes::routes(resources))
        .nest_service("/storage", storage)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Remove stored image files no produit or service record references.
/// Runs once at startup; failures are logged, never fatal.
pub async fn sweep_orphaned_images(resources: &Arc<ServerResources>) {
    let referenced = async {
        let mut paths: HashSet<String> = HashSet::new();
        paths.extend(resources.database.produits().image_paths().await?);
        paths.extend(resources.database.services().image_paths().await?);
        AppResult::Ok(paths)
    }
    .await;

    match referenced {
        Ok(paths) => match resources.images.sweep_orphans(&paths).await {
            Ok(0) => {}
            Ok(removed) => tracing::info!(removed, "orphaned image sweep finished"),
            Err(e) => tracing::warn!("orphaned image sweep failed: {e}"),
        },
        Err(e) => tracing::warn!("orphaned image sweep skipped: {e}"),
    }
}

/// Bind the listener and serve until ctrl-c
///
/// # Errors
///
/// Returns an error if the bind fails or the server loop aborts
pub async fn serve(resources: Arc<ServerResources>) -> anyhow::Result<()> {
    sweep_orphaned_images(&resources).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], resources.config.http_port));
    let app = build_router(resources);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {e}");
    }
    tracing::info!("shutdown signal received");
}
