// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, refresh, and logout handlers.

use axum::{extract::State, Json};

use crate::{
    auth::{password, Auth, AuthError, ClaimSet},
    models::{LoginRequest, LoginResponse, MessageResponse, RefreshRequest, RefreshResponse},
    state::AppState,
};

/// Authenticate credentials and mint an access + refresh token pair.
///
/// Bad credentials are `401` with the uniform message; a disabled account
/// is `403`.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let store = state.store.read().await;
    let principal =
        password::authenticate(&store, &request.username, &request.password).map_err(|e| {
            tracing::warn!(username = %request.username, "login rejected");
            e
        })?;
    if !principal.is_enabled() {
        return Err(AuthError::AccountDisabled);
    }
    drop(store);

    let claims = ClaimSet::new(principal.roles().to_vec(), principal.id());
    let access_token = state
        .issuer
        .issue_access_token(principal.username(), claims.clone())?;
    let refresh_token = state
        .issuer
        .issue_refresh_token(principal.username(), claims)?;

    tracing::info!(username = %principal.username(), "login succeeded");

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.issuer.access_ttl().as_secs(),
        username: principal.username().to_string(),
        roles: principal.roles().to_vec(),
    }))
}

/// Trade a live refresh token for a new access token.
///
/// The refresh token must be exactly a live, correctly-typed,
/// subject-matching refresh token (`401` otherwise); a disabled or deleted
/// account is `403`/`401` respectively.
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AuthError> {
    // Signature first: the subject is only trusted once the token verifies.
    let claims = state.validator.parse_claims(&request.refresh_token).await?;

    let store = state.store.read().await;
    let principal = store.get(&claims.sub).ok_or(AuthError::SubjectMismatch)?;
    if !principal.is_enabled() {
        return Err(AuthError::AccountDisabled);
    }

    state
        .validator
        .validate_refresh_token(&request.refresh_token, principal.username())
        .await?;

    let access_token = state.issuer.issue_access_token(
        principal.username(),
        ClaimSet::new(principal.roles().to_vec(), principal.id()),
    )?;

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.issuer.access_ttl().as_secs(),
    }))
}

/// Best-effort logout.
///
/// Tokens are stateless and there is no server-side denylist: a previously
/// issued token remains valid to any holder until natural expiry. Clients
/// must discard both tokens.
pub async fn logout(Auth(user): Auth) -> Json<MessageResponse> {
    tracing::info!(username = %user.username, "logout");
    Json(MessageResponse {
        message: "Logged out. Discard the access and refresh tokens client-side.".to_string(),
    })
}
