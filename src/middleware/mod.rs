// ABOUTME: Request middleware - authentication gate and CORS configuration
// ABOUTME: Policy decisions live in the permissions module; this enforces them per request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

/// Bearer-token authentication and policy enforcement
pub mod auth;
/// Cross-origin request configuration
pub mod cors;

pub use auth::{AuthGate, AuthenticatedUser};
pub use cors::setup_cors;
