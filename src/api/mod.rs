// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{policy, state::AppState};

pub mod accounts;
pub mod auth;
pub mod health;
pub mod keys;
pub mod users;

pub fn router(state: AppState) -> Router {
    // Account lifecycle is internal-only: every request in this subtree
    // passes the channel check before any handler runs.
    let internal_routes = Router::new()
        .route("/auth/accounts", post(accounts::create_account))
        .route("/auth/accounts/count", get(accounts::account_count))
        .route("/auth/accounts/{username}", delete(accounts::delete_account))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            policy::internal::guard,
        ));

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(users::me))
        .route("/.well-known/jwks.json", get(keys::jwks))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .merge(internal_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
