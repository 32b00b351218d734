// ABOUTME: Route handlers for account registration, login, profile, and logout
// ABOUTME: ADMIN_EMAIL grants the admin role at registration; tokens are stateless
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! Authentication routes
//!
//! Registration and login issue an HS256 bearer token. Logout exists for
//! client symmetry only; tokens are stateless and simply discarded.

use crate::context::ServerResources;
use crate::database::users::CreateUserRequest;
use crate::errors::AppError;
use crate::middleware::AuthGate;
use crate::models::{User, UserRole};
use crate::responses::ApiResponse;
use crate::validation::Validator;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

/// Request body for registration
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    /// Display name
    pub name: Option<String>,
    /// Login email
    pub email: Option<String>,
    /// Plaintext password
    pub password: Option<String>,
    /// Must match `password` when provided
    pub password_confirmation: Option<String>,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    /// Login email
    pub email: Option<String>,
    /// Plaintext password
    pub password: Option<String>,
}

/// Issued-token payload returned by register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The account
    pub user: User,
    /// Bearer token for the Authorization header
    pub token: String,
    /// Token expiry, RFC 3339
    pub expires_at: String,
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/register", post(Self::handle_register))
            .route("/api/login", post(Self::handle_login))
            .route("/api/user", get(Self::handle_user))
            .route("/api/logout", post(Self::handle_logout))
            .with_state(resources)
    }

    /// Handle POST /api/register - create an account and issue a token
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<RegisterBody>,
    ) -> Result<Response, AppError> {
        let mut v = Validator::new();
        let name = v.optional_string("name", body.name.as_deref(), 255);
        let email = v.required_email("email", body.email.as_deref(), 255);
        let password = match body.password.as_deref() {
            None | Some("") => {
                v.add("password", "The password field is required.");
                None
            }
            Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
                v.add(
                    "password",
                    format!("The password must be at least {MIN_PASSWORD_LEN} characters."),
                );
                None
            }
            Some(p) => {
                if let Some(confirmation) = body.password_confirmation.as_deref() {
                    if confirmation != p {
                        v.add("password", "The password confirmation does not match.");
                    }
                }
                Some(p.to_owned())
            }
        };
        v.finish()?;

        let (Some(email), Some(password)) = (email, password) else {
            return Err(AppError::internal("validation passed with missing fields"));
        };

        // ADMIN_EMAIL bootstraps the first administrator account
        let role = match &resources.config.auth.admin_email {
            Some(admin) if admin.eq_ignore_ascii_case(&email) => UserRole::Admin,
            _ => UserRole::User,
        };

        let password_hash = resources.auth.hash_password(&password)?;
        let user = resources
            .database
            .users()
            .create(&CreateUserRequest {
                email,
                password_hash,
                display_name: name,
                role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "account registered");

        let (token, expires_at) = resources.auth.generate_token(&user)?;
        let payload = TokenResponse {
            user,
            token,
            expires_at: expires_at.to_rfc3339(),
        };
        Ok(ApiResponse::with_message("Inscription réussie.", payload)
            .into_response_with_status(StatusCode::CREATED))
    }

    /// Handle POST /api/login - verify credentials and issue a token
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<LoginBody>,
    ) -> Result<Response, AppError> {
        let mut v = Validator::new();
        let email = v.required_email("email", body.email.as_deref(), 255);
        let password = v.required_string("password", body.password.as_deref(), 255);
        v.finish()?;

        let (Some(email), Some(password)) = (email, password) else {
            return Err(AppError::internal("validation passed with missing fields"));
        };

        // Same error for unknown email and wrong password
        let user = resources
            .database
            .users()
            .get_by_email(&email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Identifiants invalides."))?;

        if !resources.auth.verify_password(&password, &user.password_hash)? {
            return Err(AppError::auth_invalid("Identifiants invalides."));
        }

        let (token, expires_at) = resources.auth.generate_token(&user)?;
        let payload = TokenResponse {
            user,
            token,
            expires_at: expires_at.to_rfc3339(),
        };
        Ok(ApiResponse::with_message("Connexion réussie.", payload).into_response_with_status(StatusCode::OK))
    }

    /// Handle GET /api/user - the account behind the presented token
    async fn handle_user(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = AuthGate::load_user(&resources, &headers).await?;
        Ok(ApiResponse::data(user).into_response_with_status(StatusCode::OK))
    }

    /// Handle POST /api/logout - requires a valid token, discards nothing
    /// server-side (tokens are stateless)
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        AuthGate::authenticate(&resources, &headers).await?;
        Ok(ApiResponse::message("Déconnexion réussie.").into_response_with_status(StatusCode::OK))
    }
}
