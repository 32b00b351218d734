// ABOUTME: Per-request authentication gate enforcing the (resource, action) policy table
// ABOUTME: Admin checks re-read the database row so a revoked role takes effect immediately
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! Authentication gate
//!
//! Handlers call [`AuthGate::authorize`] with their (resource, action) pair
//! before touching the database. Public endpoints pass through without
//! credentials; admin endpoints require a valid bearer token whose user
//! still carries the admin role in the database.

use crate::auth::{extract_bearer_token, AuthManager};
use crate::context::ServerResources;
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserRole};
use crate::permissions::{required_access, Access, Action, Resource};
use axum::http::HeaderMap;
use std::sync::Arc;
use uuid::Uuid;

/// The user behind a validated bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User id from the token subject
    pub user_id: Uuid,
    /// Role as stored in the database at request time
    pub role: UserRole,
}

/// Policy enforcement entry points used by every route module
pub struct AuthGate;

impl AuthGate {
    /// Enforce the access policy for a (resource, action) pair.
    /// Returns the authenticated user when credentials were presented and
    /// valid, `None` for anonymous access to a public endpoint.
    ///
    /// # Errors
    ///
    /// Returns 401 for missing/invalid credentials on protected endpoints
    /// and 403 when the account lacks the admin role
    pub async fn authorize(
        resources: &Arc<ServerResources>,
        headers: &HeaderMap,
        resource: Resource,
        action: Action,
    ) -> AppResult<Option<AuthenticatedUser>> {
        match required_access(resource, action) {
            Access::Public => Ok(None),
            Access::Admin => {
                let user = Self::authenticate(resources, headers).await?;
                if !user.role.is_admin() {
                    return Err(AppError::permission_denied(
                        "Accès réservé aux administrateurs.",
                    ));
                }
                Ok(Some(user))
            }
        }
    }

    /// Validate the bearer token and load the account's current role
    ///
    /// # Errors
    ///
    /// Returns 401 when the header is missing, the token fails validation,
    /// or the account no longer exists
    pub async fn authenticate(
        resources: &Arc<ServerResources>,
        headers: &HeaderMap,
    ) -> AppResult<AuthenticatedUser> {
        let user = Self::load_user(resources, headers).await?;
        Ok(AuthenticatedUser {
            user_id: user.id,
            role: user.role,
        })
    }

    /// Validate the bearer token and return the full account row
    ///
    /// # Errors
    ///
    /// Returns 401 when the header is missing, the token fails validation,
    /// or the account no longer exists
    pub async fn load_user(
        resources: &Arc<ServerResources>,
        headers: &HeaderMap,
    ) -> AppResult<User> {
        let header = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(AppError::auth_required)?;

        let token = extract_bearer_token(header)?;
        let claims = resources.auth.validate_token(token)?;
        let user_id = AuthManager::user_id_from_claims(&claims)?;

        // The token's role claim is only a hint; the stored row decides
        resources
            .database
            .users()
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Unknown account"))
    }
}
