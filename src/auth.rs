// ABOUTME: JWT-based user authentication - token generation, validation, and password hashing
// ABOUTME: Issues HS256 bearer tokens; passwords are stored as bcrypt hashes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 USA Home

//! # Authentication
//!
//! JWT issue/validate plus bcrypt password hashing. Tokens are stateless;
//! logout is a client-side discard of the token.

use crate::errors::{AppError, AppResult};
use crate::models::{User, UserRole};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for user tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// User email
    pub email: String,
    /// Role at issue time; the admin gate re-reads the database row
    pub role: UserRole,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Token issue/validate and password hashing
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
    bcrypt_cost: u32,
}

impl AuthManager {
    /// Create a new auth manager from the configured secret
    #[must_use]
    pub fn new(jwt_secret: &str, expiry_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            expiry_hours,
            bcrypt_cost,
        }
    }

    /// Hash a password with bcrypt
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        bcrypt::hash(password, self.bcrypt_cost)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
    }

    /// Verify a password against its stored hash
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        bcrypt::verify(password, hash)
            .map_err(|e| AppError::internal(format!("Failed to verify password: {e}")))
    }

    /// Generate a bearer token for a user; returns the token and its expiry
    ///
    /// # Errors
    ///
    /// Returns an error if token encoding fails
    pub fn generate_token(&self, user: &User) -> AppResult<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.expiry_hours);
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;

        Ok((token, expires_at))
    }

    /// Validate a bearer token and return its claims
    ///
    /// # Errors
    ///
    /// Returns 401-class errors for expired, malformed, or forged tokens
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::auth_expired(),
                _ => AppError::auth_invalid(format!("Invalid token: {e}")),
            }
        })?;
        Ok(data.claims)
    }

    /// Parse the user id out of validated claims
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is not a UUID
    pub fn user_id_from_claims(claims: &Claims) -> AppResult<Uuid> {
        Uuid::parse_str(&claims.sub)
            .map_err(|e| AppError::auth_invalid(format!("Invalid token subject: {e}")))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
///
/// # Errors
///
/// Returns an error when the header is not a bearer credential
pub fn extract_bearer_token(auth_header: &str) -> AppResult<&str> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::auth_invalid("Authorization header must be a Bearer token"))?
        .trim();
    if token.is_empty() {
        return Err(AppError::auth_invalid("Empty bearer token"));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "admin@usahome.ma".into(),
            password_hash: String::new(),
            display_name: None,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn manager() -> AuthManager {
        // Low bcrypt cost keeps the test fast
        AuthManager::new("test-secret", 24, 4)
    }

    #[test]
    fn test_token_roundtrip() {
        let auth = manager();
        let user = test_user(UserRole::Admin);
        let (token, expires_at) = auth.generate_token(&user).unwrap();
        assert!(expires_at > Utc::now());

        let claims = auth.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(AuthManager::user_id_from_claims(&claims).unwrap(), user.id);
    }

    #[test]
    fn test_forged_token_rejected() {
        let auth = manager();
        let other = AuthManager::new("different-secret", 24, 4);
        let (token, _) = other.generate_token(&test_user(UserRole::User)).unwrap();
        assert!(auth.validate_token(&token).is_err());
        assert!(auth.validate_token("not-a-jwt").is_err());
    }

    #[test]
    fn test_password_hashing() {
        let auth = manager();
        let hash = auth.hash_password("s3cret!").unwrap();
        assert!(auth.verify_password("s3cret!", &hash).unwrap());
        assert!(!auth.verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert_eq!(extract_bearer_token("Bearer   spaced  ").unwrap(), "spaced");
        assert!(extract_bearer_token("Basic abc").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
        assert!(extract_bearer_token("").is_err());
    }
}
