// ABOUTME: Route module organization - one module per API resource
// ABOUTME: Each module exposes an XRoutes struct with a routes(resources) constructor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! HTTP routes
//!
//! Each resource gets a module with a `*Routes` struct whose `routes`
//! constructor returns an `axum::Router` wired to shared `ServerResources`.
//! The server merges them all in `server::build_router`.

/// Registration, login, profile, logout
pub mod auth;
/// Product category CRUD
pub mod categories;
/// Contact message submission and triage
pub mod contacts;
/// Quote request submission and triage
pub mod devis;
/// Multipart form parsing shared by produits and services
pub mod forms;
/// Liveness endpoints
pub mod health;
/// Produit CRUD with image upload
pub mod produits;
/// Service type CRUD with the in-use delete guard
pub mod service_types;
/// Service CRUD with image upload
pub mod services;

pub use auth::AuthRoutes;
pub use categories::CategorieRoutes;
pub use contacts::ContactRoutes;
pub use devis::DevisRoutes;
pub use health::HealthRoutes;
pub use produits::ProduitRoutes;
pub use service_types::ServiceTypeRoutes;
pub use services::ServiceRoutes;
