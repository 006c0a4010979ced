// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.
//!
//! Authentication failures (missing/invalid credentials) map to `401`,
//! authorization failures (valid identity, insufficient trust) map to `403`,
//! and the two are never conflated. Structural and cryptographic token
//! failures share a single `InvalidToken` variant so responses do not leak
//! which check failed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication/authorization error type.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Token is structurally or cryptographically invalid
    InvalidToken,
    /// Token has expired
    TokenExpired,
    /// Token carries the wrong `token_type` for this flow
    WrongTokenType,
    /// Token subject does not match the expected principal
    SubjectMismatch,
    /// Unknown username or wrong password (uniform message)
    InvalidCredentials,
    /// Account exists but is disabled
    AccountDisabled,
    /// Valid identity, required role missing
    InsufficientRole,
    /// Route requires a trusted internal channel the caller did not present
    InternalChannelRequired,
    /// No rule allows this route
    RouteDenied,
    /// Published key set could not be fetched (treated as deny)
    KeySetUnavailable(String),
    /// No published key matches the token's key ID
    NoMatchingKey,
    /// Token signing failed
    Signing(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::WrongTokenType => "wrong_token_type",
            AuthError::SubjectMismatch => "subject_mismatch",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::AccountDisabled => "account_disabled",
            AuthError::InsufficientRole => "insufficient_role",
            AuthError::InternalChannelRequired => "internal_channel_required",
            AuthError::RouteDenied => "route_denied",
            AuthError::KeySetUnavailable(_) => "key_set_unavailable",
            AuthError::NoMatchingKey => "no_matching_key",
            AuthError::Signing(_) => "token_signing_failed",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::WrongTokenType
            | AuthError::SubjectMismatch
            | AuthError::InvalidCredentials
            | AuthError::KeySetUnavailable(_)
            | AuthError::NoMatchingKey => StatusCode::UNAUTHORIZED,
            AuthError::AccountDisabled
            | AuthError::InsufficientRole
            | AuthError::InternalChannelRequired
            | AuthError::RouteDenied => StatusCode::FORBIDDEN,
            AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::InvalidToken => write!(f, "Token is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::WrongTokenType => write!(f, "Token type is not valid for this operation"),
            AuthError::SubjectMismatch => write!(f, "Token subject is not valid"),
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::AccountDisabled => write!(f, "Account is disabled"),
            AuthError::InsufficientRole => {
                write!(f, "Insufficient permissions for this operation")
            }
            AuthError::InternalChannelRequired => {
                write!(f, "This route is restricted to trusted internal callers")
            }
            AuthError::RouteDenied => write!(f, "Access to this route is denied"),
            AuthError::KeySetUnavailable(msg) => {
                write!(f, "Verification keys are unavailable: {msg}")
            }
            AuthError::NoMatchingKey => write!(f, "No matching verification key"),
            AuthError::Signing(msg) => write!(f, "Token signing failed: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
