// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity echo endpoint.

use axum::Json;
use serde::Serialize;

use crate::auth::{Auth, AuthenticatedUser, Role};

/// Response for GET /auth/me
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    /// Authenticated username (token subject)
    pub username: String,
    /// Numeric principal ID
    pub user_id: u64,
    /// Resolved roles
    pub roles: Vec<Role>,
    /// `ROLE_`-prefixed authorities as the policy layer sees them
    pub authorities: Vec<String>,
}

impl From<AuthenticatedUser> for MeResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            authorities: user.authorities(),
            username: user.username,
            user_id: user.user_id,
            roles: user.roles,
        }
    }
}

/// Return the identity and roles of the currently authenticated caller.
pub async fn me(Auth(user): Auth) -> Json<MeResponse> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn me_response_reflects_the_authenticated_user() {
        let user = AuthenticatedUser {
            username: "alice".to_string(),
            user_id: 42,
            roles: vec![Role::Dealer],
            expires_at: 0,
        };

        let response: MeResponse = user.into();
        assert_eq!(response.username, "alice");
        assert_eq!(response.user_id, 42);
        assert_eq!(response.roles, vec![Role::Dealer]);
        assert_eq!(response.authorities, vec!["ROLE_DEALER".to_string()]);
    }
}
