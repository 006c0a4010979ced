// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Internal-call authorization: the per-service decision point for traffic
//! that did not necessarily arrive through the gateway.
//!
//! Downstream services cannot assume every request passed the edge, so each
//! route is classified into one of three trust channels:
//!
//! - **Gateway-originated**: the gateway marker header asserts the edge
//!   already authenticated the caller. External clients must never be able
//!   to set this header; the network topology is the primary control and
//!   this check is the defense-in-depth backstop.
//! - **Service peer**: the `X-Internal-Service` header names a specific
//!   trusted peer, for privileged operations only that peer may invoke.
//! - **Either**: routes both a human admin (via gateway) and a peer service
//!   need, e.g. dashboard aggregation reads.
//!
//! Any route without an explicit classification is denied. That fallback is
//! a literal rule in [`InternalPolicy::check`], not an omission.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::error::AuthError;
use crate::state::AppState;

use super::rules::PathPattern;

/// Header naming the calling peer service (shared-secret substitute; the
/// value is compared for equality with the configured peer name).
pub const INTERNAL_SERVICE_HEADER: &str = "x-internal-service";

/// Marker header asserting the request was forwarded by the gateway.
pub const GATEWAY_MARKER_HEADER: &str = "x-gateway-origin";

/// Trust channel required by an internal rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalChannel {
    /// Must carry the gateway marker
    GatewayOriginated,
    /// Must carry `X-Internal-Service` naming this peer
    ServicePeer(String),
    /// Either the gateway marker or this peer's secret
    Either(String),
}

/// Verified caller class for an allowed internal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalCaller {
    /// Arrived through the trusted edge
    Gateway,
    /// Direct call from the named peer service
    Peer(String),
}

/// One internal route classification.
#[derive(Debug, Clone)]
struct InternalRule {
    method: Option<Method>,
    pattern: PathPattern,
    channel: InternalChannel,
}

/// Per-service internal-call policy: ordered route classifications plus the
/// deployment's gateway marker value.
#[derive(Debug, Clone)]
pub struct InternalPolicy {
    gateway_marker: String,
    rules: Vec<InternalRule>,
}

impl InternalPolicy {
    pub fn new(gateway_marker: String) -> Self {
        Self {
            gateway_marker,
            rules: Vec::new(),
        }
    }

    /// Classify a route for a single method.
    pub fn route(mut self, method: Method, pattern: &str, channel: InternalChannel) -> Self {
        self.rules.push(InternalRule {
            method: Some(method),
            pattern: PathPattern::parse(pattern),
            channel,
        });
        self
    }

    /// This service's internal surface: account management is reserved for
    /// the user service; the account count is a dashboard read that both an
    /// admin (via gateway) and the report service need.
    pub fn commerce_defaults(gateway_marker: String, account_peer: String) -> Self {
        Self::new(gateway_marker)
            .route(
                Method::POST,
                "/auth/accounts",
                InternalChannel::ServicePeer(account_peer.clone()),
            )
            .route(
                Method::DELETE,
                "/auth/accounts/{username}",
                InternalChannel::ServicePeer(account_peer.clone()),
            )
            .route(
                Method::GET,
                "/auth/accounts/count",
                InternalChannel::Either(account_peer),
            )
    }

    /// Decide whether this request may use its route.
    ///
    /// Bearer tokens are irrelevant here: a request on a peer-only route is
    /// denied without the peer header no matter what token it presents.
    pub fn check(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<InternalCaller, AuthError> {
        let rule = self
            .rules
            .iter()
            .find(|rule| {
                rule.method.as_ref().is_none_or(|m| m == method) && rule.pattern.matches(path)
            })
            // Deny-by-default: unclassified internal routes are never served.
            .ok_or(AuthError::RouteDenied)?;

        match &rule.channel {
            InternalChannel::GatewayOriginated => self.gateway_caller(headers),
            InternalChannel::ServicePeer(peer) => self.peer_caller(headers, peer),
            InternalChannel::Either(peer) => self
                .peer_caller(headers, peer)
                .or_else(|_| self.gateway_caller(headers)),
        }
    }

    fn gateway_caller(&self, headers: &HeaderMap) -> Result<InternalCaller, AuthError> {
        let marker = headers
            .get(GATEWAY_MARKER_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::InternalChannelRequired)?;
        if marker != self.gateway_marker {
            return Err(AuthError::InternalChannelRequired);
        }
        Ok(InternalCaller::Gateway)
    }

    fn peer_caller(&self, headers: &HeaderMap, peer: &str) -> Result<InternalCaller, AuthError> {
        let named = headers
            .get(INTERNAL_SERVICE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::InternalChannelRequired)?;
        if named != peer {
            return Err(AuthError::InternalChannelRequired);
        }
        Ok(InternalCaller::Peer(named.to_string()))
    }
}

/// Middleware guarding the internal route subtree.
///
/// Mount with `axum::middleware::from_fn_with_state(state, guard)`.
pub async fn guard(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match state
        .internal
        .check(request.method(), request.uri().path(), request.headers())
    {
        Ok(caller) => {
            request.extensions_mut().insert(caller);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(
                method = %request.method(),
                path = request.uri().path(),
                error_code = e.error_code(),
                "internal route denied"
            );
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn policy() -> InternalPolicy {
        InternalPolicy::commerce_defaults("relational-gateway".to_string(), "user-service".to_string())
    }

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn peer_route_requires_the_named_peer() {
        let p = policy();

        let ok = p.check(
            &Method::POST,
            "/auth/accounts",
            &headers(&[("x-internal-service", "user-service")]),
        );
        assert_eq!(ok.unwrap(), InternalCaller::Peer("user-service".to_string()));

        let wrong_peer = p.check(
            &Method::POST,
            "/auth/accounts",
            &headers(&[("x-internal-service", "order-service")]),
        );
        assert!(matches!(wrong_peer, Err(AuthError::InternalChannelRequired)));
    }

    #[test]
    fn bearer_tokens_do_not_open_peer_routes() {
        // Even a well-formed Authorization header is irrelevant on a
        // peer-only route.
        let denied = policy().check(
            &Method::POST,
            "/auth/accounts",
            &headers(&[("authorization", "Bearer some.valid.token")]),
        );
        assert!(matches!(denied, Err(AuthError::InternalChannelRequired)));
    }

    #[test]
    fn gateway_marker_must_match_the_configured_value() {
        let p = policy();

        let ok = p.check(
            &Method::GET,
            "/auth/accounts/count",
            &headers(&[("x-gateway-origin", "relational-gateway")]),
        );
        assert_eq!(ok.unwrap(), InternalCaller::Gateway);

        let spoofed = p.check(
            &Method::GET,
            "/auth/accounts/count",
            &headers(&[("x-gateway-origin", "something-else")]),
        );
        assert!(matches!(spoofed, Err(AuthError::InternalChannelRequired)));
    }

    #[test]
    fn either_channel_accepts_both_callers() {
        let p = policy();

        let via_peer = p.check(
            &Method::GET,
            "/auth/accounts/count",
            &headers(&[("x-internal-service", "user-service")]),
        );
        assert_eq!(via_peer.unwrap(), InternalCaller::Peer("user-service".to_string()));

        let via_gateway = p.check(
            &Method::GET,
            "/auth/accounts/count",
            &headers(&[("x-gateway-origin", "relational-gateway")]),
        );
        assert_eq!(via_gateway.unwrap(), InternalCaller::Gateway);

        let neither = p.check(&Method::GET, "/auth/accounts/count", &HeaderMap::new());
        assert!(matches!(neither, Err(AuthError::InternalChannelRequired)));
    }

    #[test]
    fn unclassified_routes_are_denied_by_default() {
        let with_all_headers = headers(&[
            ("x-internal-service", "user-service"),
            ("x-gateway-origin", "relational-gateway"),
        ]);
        let denied = policy().check(&Method::GET, "/auth/accounts/export", &with_all_headers);
        assert!(matches!(denied, Err(AuthError::RouteDenied)));
    }

    #[test]
    fn method_mismatch_falls_through_to_deny() {
        let denied = policy().check(
            &Method::PUT,
            "/auth/accounts",
            &headers(&[("x-internal-service", "user-service")]),
        );
        assert!(matches!(denied, Err(AuthError::RouteDenied)));
    }
}
