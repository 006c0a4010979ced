// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Internal account lifecycle endpoints.
//!
//! These routes sit behind the internal-call guard
//! ([`crate::policy::internal::guard`]): account creation and deletion are
//! reserved for the user service's registration flows, and the account
//! count is a dashboard read open to the gateway channel as well. Handlers
//! here never see a request that failed the channel check.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::password::{hash_password, PasswordError},
    auth::roles::Role,
    error::ApiError,
    models::{AccountCountResponse, AccountResponse, CreateAccountRequest},
    state::AppState,
    store::{Principal, StoreError},
};

impl From<&Principal> for AccountResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id(),
            username: principal.username().to_string(),
            roles: principal.roles().to_vec(),
            enabled: principal.is_enabled(),
        }
    }
}

/// Create an account (user-service registration flows).
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    if request.username.trim().is_empty() {
        return Err(ApiError::bad_request("Username must not be empty"));
    }

    let mut roles = Vec::with_capacity(request.roles.len());
    for name in &request.roles {
        match Role::from_str(name) {
            Some(role) => roles.push(role),
            None => return Err(ApiError::bad_request(format!("Unknown role: {name}"))),
        }
    }

    let hash = hash_password(&request.password).map_err(|e| match e {
        PasswordError::TooShort => ApiError::bad_request(e.to_string()),
        PasswordError::Hashing(_) => ApiError::internal(e.to_string()),
    })?;

    let mut store = state.store.write().await;
    let principal = store
        .create(&request.username, &hash, roles)
        .map_err(|e| match e {
            StoreError::AlreadyExists(_) => ApiError::conflict(e.to_string()),
            StoreError::NotFound(_) => ApiError::internal(e.to_string()),
        })?;

    tracing::info!(username = %principal.username(), id = principal.id(), "account created");
    Ok(Json(AccountResponse::from(&principal)))
}

/// Delete an account (admin or cascading account-deletion calls).
pub async fn delete_account(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<(), ApiError> {
    let mut store = state.store.write().await;
    store
        .delete(&username)
        .map_err(|e| ApiError::not_found(e.to_string()))?;

    tracing::info!(%username, "account deleted");
    Ok(())
}

/// Number of stored accounts (dashboard aggregation read).
pub async fn account_count(State(state): State<AppState>) -> Json<AccountCountResponse> {
    let store = state.store.read().await;
    Json(AccountCountResponse {
        count: store.count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::teststate;
    use axum::http::StatusCode;

    fn create_request(username: &str, password: &str, roles: &[&str]) -> Json<CreateAccountRequest> {
        Json(CreateAccountRequest {
            username: username.to_string(),
            password: password.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        })
    }

    #[tokio::test]
    async fn create_account_stores_a_usable_principal() {
        let state = teststate::state();

        let Json(created) = create_account(
            State(state.clone()),
            create_request("dealer-7", "password123", &["DEALER"]),
        )
        .await
        .expect("create");

        assert_eq!(created.username, "dealer-7");
        assert_eq!(created.roles, vec![Role::Dealer]);
        assert!(created.enabled);
        assert!(created.id > 0);

        let store = state.store.read().await;
        assert!(store.get("dealer-7").is_some());
    }

    #[tokio::test]
    async fn duplicate_account_is_409() {
        let state = teststate::state();
        create_account(
            State(state.clone()),
            create_request("bob", "password123", &[]),
        )
        .await
        .expect("create");

        let err = create_account(State(state), create_request("bob", "password123", &[]))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn unknown_role_is_rejected() {
        let state = teststate::state();
        let err = create_account(
            State(state),
            create_request("bob", "password123", &["SUPERUSER"]),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("SUPERUSER"));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let state = teststate::state();
        let err = create_account(State(state), create_request("bob", "short", &[]))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_removes_and_404s_after() {
        let state = teststate::state();
        create_account(
            State(state.clone()),
            create_request("bob", "password123", &[]),
        )
        .await
        .expect("create");

        delete_account(State(state.clone()), Path("bob".to_string()))
            .await
            .expect("delete");

        let err = delete_account(State(state), Path("bob".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn count_tracks_creations() {
        let state = teststate::state();
        let Json(before) = account_count(State(state.clone())).await;
        assert_eq!(before.count, 0);

        create_account(
            State(state.clone()),
            create_request("bob", "password123", &[]),
        )
        .await
        .expect("create");

        let Json(after) = account_count(State(state)).await;
        assert_eq!(after.count, 1);
    }
}
