// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the REST API. Wire names are
//! camelCase to match the platform's client contracts.
//!
//! ## Model Categories
//!
//! - **Login / Refresh**: credential exchange and token renewal
//! - **Accounts**: internal-only account lifecycle, driven by the user
//!   service
//! - **Me**: identity echo for authenticated callers

use serde::{Deserialize, Serialize};

use crate::auth::roles::Role;

// =============================================================================
// Login & Refresh
// =============================================================================

/// Credentials presented to `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login: a fresh access + refresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed access token.
    pub access_token: String,
    /// Signed refresh token.
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access-token lifetime in seconds.
    pub expires_in: u64,
    /// Authenticated username.
    pub username: String,
    /// Roles embedded in the token.
    pub roles: Vec<Role>,
}

/// Refresh token presented to `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful refresh: a new access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Signed access token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access-token lifetime in seconds.
    pub expires_in: u64,
}

/// Acknowledgement body for logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Accounts (internal)
// =============================================================================

/// Account-creation request from the user service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub username: String,
    pub password: String,
    /// Bare role names; unknown names are rejected.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Stored account, without credential material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: u64,
    pub username: String,
    pub roles: Vec<Role>,
    pub enabled: bool,
}

/// Dashboard aggregation read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCountResponse {
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_uses_camel_case_wire_names() {
        let response = LoginResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 86_400,
            username: "alice".to_string(),
            roles: vec![Role::Admin],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(json["tokenType"], "Bearer");
        assert_eq!(json["expiresIn"], 86_400);
        assert_eq!(json["roles"][0], "ADMIN");
    }

    #[test]
    fn refresh_request_parses_camel_case() {
        let request: RefreshRequest =
            serde_json::from_str(r#"{"refreshToken":"tok"}"#).unwrap();
        assert_eq!(request.refresh_token, "tok");
    }

    #[test]
    fn create_account_roles_default_to_empty() {
        let request: CreateAccountRequest =
            serde_json::from_str(r#"{"username":"bob","password":"password123"}"#).unwrap();
        assert!(request.roles.is_empty());
    }
}
