// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated callers.
//!
//! Use the `Auth` extractor in handlers to require a valid bearer token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::claims::{AuthenticatedUser, TokenType};
use super::error::AuthError;
use crate::state::AppState;

/// Pull the bearer token out of an Authorization header value.
fn bearer_token(header_value: &str) -> Result<&str, AuthError> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Extractor for authenticated users.
///
/// Validates the `Authorization: Bearer` token against the in-process
/// signing keys and yields the verified identity. If upstream middleware
/// already attached an [`AuthenticatedUser`] (gateway-forwarded requests),
/// that identity is reused without re-validating.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the user
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;
        let token = bearer_token(auth_header)?;

        let claims = state.validator.parse_claims(token).await?;
        if claims.token_type != TokenType::Access {
            return Err(AuthError::WrongTokenType);
        }
        if claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        Ok(Auth(AuthenticatedUser::from_claims(&claims)))
    }
}

/// Extractor that requires the admin role.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AuthError::InsufficientRole);
        }

        Ok(AdminOnly(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::Role;
    use crate::auth::token::ClaimSet;
    use crate::state::teststate;
    use axum::http::Request;

    fn request_parts(auth_header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = auth_header {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let state = teststate::state();
        let mut parts = request_parts(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn non_bearer_header_is_rejected() {
        let state = teststate::state();
        let mut parts = request_parts(Some("Basic dXNlcjpwYXNz"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn valid_access_token_authenticates() {
        let state = teststate::state();
        let token = state
            .issuer
            .issue_access_token("alice", ClaimSet::new(vec![Role::Dealer], 5))
            .expect("issue");
        let mut parts = request_parts(Some(&format!("Bearer {token}")));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state)
            .await
            .expect("auth");
        assert_eq!(user.username, "alice");
        assert_eq!(user.user_id, 5);
        assert_eq!(user.roles, vec![Role::Dealer]);
    }

    #[tokio::test]
    async fn refresh_token_is_not_accepted_as_bearer_credential() {
        let state = teststate::state();
        let token = state
            .issuer
            .issue_refresh_token("alice", ClaimSet::default())
            .expect("issue");
        let mut parts = request_parts(Some(&format!("Bearer {token}")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::WrongTokenType)));
    }

    #[tokio::test]
    async fn extractor_prefers_extensions() {
        let state = teststate::state();
        let mut parts = request_parts(None);

        let user = AuthenticatedUser {
            username: "from-gateway".to_string(),
            user_id: 9,
            roles: vec![Role::Admin],
            expires_at: 0,
        };
        parts.extensions.insert(user.clone());

        let Auth(extracted) = Auth::from_request_parts(&mut parts, &state)
            .await
            .expect("auth");
        assert_eq!(extracted.username, "from-gateway");
    }

    #[tokio::test]
    async fn admin_only_rejects_non_admin() {
        let state = teststate::state();
        let token = state
            .issuer
            .issue_access_token("carol", ClaimSet::new(vec![Role::Customer], 2))
            .expect("issue");
        let mut parts = request_parts(Some(&format!("Bearer {token}")));

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientRole)));
    }

    #[tokio::test]
    async fn admin_only_accepts_admin() {
        let state = teststate::state();
        let token = state
            .issuer
            .issue_access_token("root", ClaimSet::new(vec![Role::Admin], 1))
            .expect("issue");
        let mut parts = request_parts(Some(&format!("Bearer {token}")));

        let AdminOnly(user) = AdminOnly::from_request_parts(&mut parts, &state)
            .await
            .expect("auth");
        assert!(user.is_admin());
    }
}
