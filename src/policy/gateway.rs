// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Edge authorization: the single decision point the API gateway evaluates
//! for every inbound request.
//!
//! The gateway terminates authentication for the whole platform. It matches
//! each request against the ordered rule table, delegates signature and
//! expiry checks to [`TokenValidator`], and on success forwards the request
//! with the verified identity attached as a request extension. Downstream
//! services never re-implement this logic; they apply the internal-call
//! policy instead.
//!
//! A missing or invalid credential is `401`; a valid identity without the
//! required role is `403`. The two are never conflated.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::claims::{AuthenticatedUser, TokenType};
use crate::auth::error::AuthError;
use crate::auth::token::TokenValidator;

use super::rules::{RouteAccess, RuleTable};

/// Outcome of an allow decision.
#[derive(Debug)]
pub enum GatewayDecision {
    /// Rule was public; no identity attached
    Public,
    /// Caller authenticated (and passed any role requirement)
    Authenticated(AuthenticatedUser),
}

/// The edge decision point: ordered rules plus a token validator.
///
/// At the gateway the validator is backed by the published key set
/// ([`TokenValidator::remote`]); in-process tests use a local one.
#[derive(Clone)]
pub struct GatewayPolicy {
    rules: RuleTable,
    validator: Arc<TokenValidator>,
}

impl GatewayPolicy {
    pub fn new(rules: RuleTable, validator: Arc<TokenValidator>) -> Self {
        Self { rules, validator }
    }

    /// Policy over the platform's default rule table.
    pub fn commerce_defaults(validator: Arc<TokenValidator>) -> Self {
        Self::new(RuleTable::commerce_defaults(), validator)
    }

    /// Evaluate one request. Fresh per request; nothing is persisted.
    pub async fn evaluate(
        &self,
        method: &Method,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<GatewayDecision, AuthError> {
        match self.rules.evaluate(method, path) {
            RouteAccess::Public => Ok(GatewayDecision::Public),
            RouteAccess::Deny => Err(AuthError::RouteDenied),
            RouteAccess::Authenticated => {
                let user = self.authenticate(bearer).await?;
                Ok(GatewayDecision::Authenticated(user))
            }
            RouteAccess::Role(role) => {
                let user = self.authenticate(bearer).await?;
                if !user.has_role(*role) {
                    return Err(AuthError::InsufficientRole);
                }
                Ok(GatewayDecision::Authenticated(user))
            }
        }
    }

    /// Verify the bearer token and build the caller identity.
    ///
    /// Key-set failures surface as errors here and therefore deny the
    /// request: the edge fails closed, never open.
    async fn authenticate(&self, bearer: Option<&str>) -> Result<AuthenticatedUser, AuthError> {
        let token = bearer.ok_or(AuthError::MissingAuthHeader)?;
        let claims = self.validator.parse_claims(token).await?;
        if claims.token_type != TokenType::Access {
            return Err(AuthError::WrongTokenType);
        }
        if claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }
        Ok(AuthenticatedUser::from_claims(&claims))
    }
}

/// Gateway middleware: evaluate the policy, then forward with the verified
/// identity attached.
///
/// Mount with `axum::middleware::from_fn_with_state(policy, authorize)`.
pub async fn authorize(
    State(policy): State<Arc<GatewayPolicy>>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .map(str::to_string);

    let decision = policy
        .evaluate(request.method(), request.uri().path(), bearer.as_deref())
        .await;

    match decision {
        Ok(GatewayDecision::Public) => next.run(request).await,
        Ok(GatewayDecision::Authenticated(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                method = %request.method(),
                path = request.uri().path(),
                error_code = e.error_code(),
                "edge request denied"
            );
            e.into_response()
        }
    }
}
