// ABOUTME: Domain model organization for the USA Home catalog and quote-request entities
// ABOUTME: Re-exports entity structs and status enums used across database and route layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! Domain models
//!
//! One module per entity family. Each status/type enum carries
//! `as_str`/`parse` pairs for its database string representation.

/// Catalog entities: produits, services, categories, service types
pub mod catalog;
/// Contact messages and their status workflow
pub mod contact;
/// Quote requests (devis) and their status workflow
pub mod devis;
/// User accounts and roles
pub mod user;

pub use catalog::{CategorieProduit, Produit, Service, ServiceType};
pub use contact::{Contact, ContactStatus};
pub use devis::{Devis, DevisStatus, DevisType};
pub use user::{User, UserRole};
