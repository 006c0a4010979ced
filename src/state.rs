// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::keys::SigningKeys;
use crate::auth::token::{TokenIssuer, TokenValidator};
use crate::config::AppConfig;
use crate::policy::internal::InternalPolicy;
use crate::store::PrincipalStore;

/// Shared application state.
///
/// The signing keys are written once here, before any request handling
/// begins, and read-only thereafter - issuer and validator hold the same
/// `Arc` and need no locking. The principal store is the only mutable
/// piece.
#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<SigningKeys>,
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
    pub store: Arc<RwLock<PrincipalStore>>,
    pub internal: Arc<InternalPolicy>,
}

impl AppState {
    pub fn new(keys: SigningKeys, config: &AppConfig) -> Self {
        let keys = Arc::new(keys);
        let issuer =
            TokenIssuer::new(keys.clone()).with_ttls(config.access_ttl, config.refresh_ttl);
        let validator = TokenValidator::local(keys.clone());
        let internal = InternalPolicy::commerce_defaults(
            config.gateway_marker.clone(),
            config.account_service_peer.clone(),
        );

        Self {
            keys,
            issuer: Arc::new(issuer),
            validator: Arc::new(validator),
            store: Arc::new(RwLock::new(PrincipalStore::new())),
            internal: Arc::new(internal),
        }
    }
}

#[cfg(test)]
pub(crate) mod teststate {
    use super::*;
    use crate::auth::keys::testkeys;

    /// AppState over the shared test keypair and default config.
    pub(crate) fn state() -> AppState {
        let keys = testkeys::shared();
        let config = AppConfig::default();
        let issuer = TokenIssuer::new(keys.clone()).with_ttls(config.access_ttl, config.refresh_ttl);
        let validator = TokenValidator::local(keys.clone());
        let internal = InternalPolicy::commerce_defaults(
            config.gateway_marker.clone(),
            config.account_service_peer.clone(),
        );

        AppState {
            keys,
            issuer: Arc::new(issuer),
            validator: Arc::new(validator),
            store: Arc::new(RwLock::new(PrincipalStore::new())),
            internal: Arc::new(internal),
        }
    }
}
