// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr};

use tracing_subscriber::EnvFilter;

use relational_auth_server::{
    api::router,
    auth::{keys::SigningKeys, password::hash_password, roles::Role},
    config::{AppConfig, SEED_ADMIN_PASSWORD_ENV, SEED_ADMIN_USERNAME_ENV},
    state::AppState,
};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AppConfig::from_env();

    // The keypair is a hard dependency: without it the service can neither
    // mint nor verify anything, so startup fails here rather than serving.
    tracing::info!("Generating signing keys...");
    let keys = SigningKeys::generate().expect("Signing key generation failed");
    tracing::info!(kid = keys.kid(), "Signing keys ready");

    let state = AppState::new(keys, &config);

    if let (Ok(username), Ok(password)) = (
        env::var(SEED_ADMIN_USERNAME_ENV),
        env::var(SEED_ADMIN_PASSWORD_ENV),
    ) {
        let hash = hash_password(&password).expect("Seed admin password rejected");
        state
            .store
            .write()
            .await
            .create(&username, &hash, vec![Role::Admin])
            .expect("Seed admin creation failed");
        tracing::info!(%username, "Seeded admin account");
    }

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(%addr, "Relational auth server listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app)
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    if env::var("LOG_FORMAT").is_ok_and(|v| v == "json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
