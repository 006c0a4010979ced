// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key-set publication endpoint.

use axum::{extract::State, Json};

use crate::auth::keys::KeySetDocument;
use crate::state::AppState;

/// Serve the public key set.
///
/// Unauthenticated on purpose: every service on the platform fetches this
/// document to validate tokens without ever seeing the private key.
pub async fn jwks(State(state): State<AppState>) -> Json<KeySetDocument> {
    Json(state.keys.key_set_document())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::ClaimSet;
    use crate::state::teststate;
    use axum::extract::State;

    #[tokio::test]
    async fn published_kid_matches_issued_token_headers() {
        let state = teststate::state();

        let Json(document) = jwks(State(state.clone())).await;
        assert_eq!(document.keys.len(), 1);

        let token = state
            .issuer
            .issue_access_token("alice", ClaimSet::default())
            .expect("issue");
        let header = jsonwebtoken::decode_header(&token).expect("header");

        assert_eq!(header.kid.as_deref(), Some(document.keys[0].kid.as_str()));
    }

    #[tokio::test]
    async fn document_advertises_rs256_signing_use() {
        let state = teststate::state();
        let Json(document) = jwks(State(state)).await;

        let jwk = &document.keys[0];
        assert_eq!(jwk.kty, "RSA");
        assert_eq!(jwk.alg, "RS256");
        assert_eq!(jwk.key_use, "sig");
    }
}
