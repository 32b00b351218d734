// ABOUTME: Main library entry point for the USA Home e-commerce API server
// ABOUTME: REST API for quote requests, contact messages, and catalog management
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

#![deny(unsafe_code)]

//! # USA Home Server
//!
//! Backend for the USA Home storefront: a REST API serving quote requests
//! (devis), visitor contact messages, and the product/service catalog with
//! image uploads.
//!
//! ## Features
//!
//! - **Public submissions**: visitors send quote requests and contact
//!   messages without an account
//! - **Admin triage**: status workflows and live statistics behind JWT
//!   bearer authentication with a role check
//! - **Catalog management**: produits, services, categories, and service
//!   types with image uploads served under `/storage`
//! - **Uniform envelope**: every endpoint answers
//!   `{"success", "message", "data"}` for success and
//!   `{"success": false, "message", "errors"}` for failure
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use usa_home_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     // JWT_SECRET is the only required environment variable
//!     let config = ServerConfig::from_env()?;
//!     println!("USA Home server configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// JWT issue/validate and password hashing
pub mod auth;
/// Environment-driven configuration
pub mod config;
/// Shared per-request resources
pub mod context;
/// SQLite connection pool and table managers
pub mod database;
/// Unified error handling and the error envelope
pub mod errors;
/// Structured logging setup
pub mod logging;
/// Request middleware (authentication gate, CORS)
pub mod middleware;
/// Domain entities
pub mod models;
/// The (resource, action) authorization policy
pub mod permissions;
/// Uniform success envelope
pub mod responses;
/// HTTP route handlers
pub mod routes;
/// Router assembly and server lifecycle
pub mod server;
/// Uploaded image storage
pub mod storage;
/// Per-field request validation
pub mod validation;
