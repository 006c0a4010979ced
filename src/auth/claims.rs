// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated user representation.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::roles::Role;

/// Clock skew tolerance applied to expiry checks (60 seconds).
pub const CLOCK_SKEW_LEEWAY: i64 = 60;

/// Token type claim.
///
/// Access and refresh tokens are signed with the same key; the explicit
/// `token_type` claim is what keeps the two lifecycles apart. Validators
/// check this claim on every validation rather than relying on TTL alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived bearer credential for API calls
    Access,
    /// Long-lived credential used solely to obtain a new access token
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims embedded in every platform token.
///
/// The fields every consumer depends on are typed; anything else a future
/// issuer adds rides along in the flattened `extra` map without breaking
/// older validators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Token type (`access` | `refresh`)
    pub token_type: TokenType,

    /// Role names, bare and uppercase (no `ROLE_` prefix)
    #[serde(default)]
    pub roles: Vec<String>,

    /// Numeric principal ID
    #[serde(rename = "userId", default)]
    pub user_id: u64,

    /// Open extension bag for claims this service does not interpret
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Whether the embedded expiry has passed, with clock-skew leeway.
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp() - CLOCK_SKEW_LEEWAY
    }

    /// Parse the roles claim into known platform roles.
    ///
    /// Unknown names are skipped. An empty result (missing claim, or no
    /// recognizable names) maps to the baseline Customer role - tokens are
    /// never rejected for lacking roles.
    pub fn resolved_roles(&self) -> Vec<Role> {
        let roles: Vec<Role> = self
            .roles
            .iter()
            .filter_map(|r| Role::from_str(r))
            .collect();
        if roles.is_empty() {
            vec![Role::Customer]
        } else {
            roles
        }
    }
}

/// Authenticated identity extracted from a verified token.
///
/// This is the type attached to request extensions once the gateway (or a
/// local extractor) has verified the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Username (token subject)
    pub username: String,

    /// Numeric principal ID
    pub user_id: u64,

    /// Resolved platform roles (baseline Customer if the token carried none)
    pub roles: Vec<Role>,

    /// Token expiration (Unix timestamp, used for logging, not serialized)
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Build from verified claims, applying the baseline-role fallback.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            username: claims.sub.clone(),
            user_id: claims.user_id,
            roles: claims.resolved_roles(),
            expires_at: claims.exp,
        }
    }

    /// `ROLE_`-prefixed authority names for rule checks.
    pub fn authorities(&self) -> Vec<String> {
        self.roles.iter().map(Role::authority).collect()
    }

    /// Check membership of a specific role.
    pub fn has_role(&self, required: Role) -> bool {
        self.roles.contains(&required)
    }

    /// Check if this user is an admin.
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims(roles: Vec<String>) -> Claims {
        Claims {
            sub: "alice".to_string(),
            iat: 1_700_000_000,
            exp: Utc::now().timestamp() + 3600,
            token_type: TokenType::Access,
            roles,
            user_id: 42,
            extra: HashMap::new(),
        }
    }

    #[test]
    fn token_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TokenType::Access).unwrap(),
            r#""access""#
        );
        assert_eq!(
            serde_json::from_str::<TokenType>(r#""refresh""#).unwrap(),
            TokenType::Refresh
        );
    }

    #[test]
    fn missing_roles_claim_maps_to_baseline_customer() {
        let user = AuthenticatedUser::from_claims(&sample_claims(vec![]));
        assert_eq!(user.roles, vec![Role::Customer]);
        assert_eq!(user.authorities(), vec!["ROLE_CUSTOMER".to_string()]);
    }

    #[test]
    fn unknown_role_names_are_skipped() {
        let claims = sample_claims(vec!["ADMIN".into(), "WIZARD".into()]);
        let user = AuthenticatedUser::from_claims(&claims);
        assert_eq!(user.roles, vec![Role::Admin]);
    }

    #[test]
    fn only_unknown_role_names_fall_back_to_customer() {
        let claims = sample_claims(vec!["WIZARD".into()]);
        let user = AuthenticatedUser::from_claims(&claims);
        assert_eq!(user.roles, vec![Role::Customer]);
    }

    #[test]
    fn expiry_check_honors_leeway() {
        let mut claims = sample_claims(vec![]);
        claims.exp = Utc::now().timestamp() - 10;
        assert!(!claims.is_expired());

        claims.exp = Utc::now().timestamp() - CLOCK_SKEW_LEEWAY - 10;
        assert!(claims.is_expired());
    }

    #[test]
    fn extra_claims_round_trip_through_serde() {
        let mut claims = sample_claims(vec!["ADMIN".into()]);
        claims
            .extra
            .insert("tenant".to_string(), serde_json::json!("eu-west"));

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["tenant"], "eu-west");
        assert_eq!(json["userId"], 42);

        let back: Claims = serde_json::from_value(json).unwrap();
        assert_eq!(back.extra["tenant"], serde_json::json!("eu-west"));
    }
}
