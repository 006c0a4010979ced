// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Platform roles for authorization.

use serde::{Deserialize, Serialize};

/// Platform roles carried in token claims.
///
/// ## Role Hierarchy
///
/// - `Admin` - Full access, including platform-wide listings and reports
/// - `Dealer` - Merchant account, manages its own products and media
/// - `Customer` - Baseline shopper role; the default for tokens that carry
///   no roles claim at all
///
/// Tokens store bare uppercase names (`"ADMIN"`). The `ROLE_` prefix the
/// authorization layer's role-check convention expects is added by
/// [`Role::authority`] when claims are mapped to authorities, never stored
/// in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Merchant (dealer) account
    Dealer,
    /// Normal shopper account
    Customer,
}

impl Role {
    /// Bare claim name as stored in tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Dealer => "DEALER",
            Role::Customer => "CUSTOMER",
        }
    }

    /// Authority name with the `ROLE_` prefix expected by route rules.
    pub fn authority(&self) -> String {
        format!("ROLE_{}", self.as_str())
    }

    /// Parse a role from a claim value (case-insensitive).
    ///
    /// Unknown names yield `None`; callers ignore them rather than reject
    /// the token.
    pub fn from_str(s: &str) -> Option<Role> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "DEALER" => Some(Role::Dealer),
            "CUSTOMER" => Some(Role::Customer),
            _ => None,
        }
    }
}

impl Default for Role {
    /// Default role is Customer (least privilege for authenticated users).
    fn default() -> Self {
        Role::Customer
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_parses_case_insensitively() {
        assert_eq!(Role::from_str("admin"), Some(Role::Admin));
        assert_eq!(Role::from_str("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_str("Dealer"), Some(Role::Dealer));
        assert_eq!(Role::from_str("customer"), Some(Role::Customer));
        assert_eq!(Role::from_str("unknown"), None);
    }

    #[test]
    fn authority_adds_role_prefix() {
        assert_eq!(Role::Admin.authority(), "ROLE_ADMIN");
        assert_eq!(Role::Dealer.authority(), "ROLE_DEALER");
        assert_eq!(Role::Customer.authority(), "ROLE_CUSTOMER");
    }

    #[test]
    fn serializes_to_bare_uppercase_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""ADMIN""#);
        assert_eq!(
            serde_json::from_str::<Role>(r#""DEALER""#).unwrap(),
            Role::Dealer
        );
    }

    #[test]
    fn default_role_is_customer() {
        assert_eq!(Role::default(), Role::Customer);
    }
}
