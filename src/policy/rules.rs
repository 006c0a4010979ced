// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ordered route-access rules.
//!
//! A rule table is an ordered list of (method, path-pattern, access) tuples
//! evaluated top to bottom; the first matching rule wins and the constructor
//! appends a terminal deny-all entry so an unmatched route is always an
//! explicit `Deny`, never an omission.
//!
//! Order is significant: a more specific rule must precede any more general
//! rule that also matches its paths, or the specific rule is unreachable.

use axum::http::Method;

use crate::auth::roles::Role;

/// Required caller class for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// No credentials required
    Public,
    /// Any verified bearer token
    Authenticated,
    /// Verified bearer token carrying the given role
    Role(Role),
    /// Never allowed through the edge
    Deny,
}

/// One path segment of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Exact segment text
    Literal(String),
    /// `{name}`: any single segment
    Param,
    /// `**`: the rest of the path, including nothing
    Rest,
}

/// A slash-separated path pattern.
///
/// `{name}` matches exactly one segment; `**` (only in final position)
/// matches any remainder, including the empty one, so `/api/cart/**` also
/// matches `/api/cart` itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s == "**" {
                    Segment::Rest
                } else if s.starts_with('{') && s.ends_with('}') {
                    Segment::Param
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self { segments }
    }

    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut i = 0;
        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::Param => {
                    if i >= parts.len() {
                        return false;
                    }
                    i += 1;
                }
                Segment::Literal(text) => {
                    if i >= parts.len() || parts[i] != text {
                        return false;
                    }
                    i += 1;
                }
            }
        }
        i == parts.len()
    }
}

/// One ordered rule: (method, path-pattern, required caller class).
#[derive(Debug, Clone)]
pub struct AccessRule {
    method: Option<Method>,
    pattern: PathPattern,
    access: RouteAccess,
}

impl AccessRule {
    /// Rule for a single HTTP method.
    pub fn on(method: Method, pattern: &str, access: RouteAccess) -> Self {
        Self {
            method: Some(method),
            pattern: PathPattern::parse(pattern),
            access,
        }
    }

    /// Rule for every HTTP method.
    pub fn any(pattern: &str, access: RouteAccess) -> Self {
        Self {
            method: None,
            pattern: PathPattern::parse(pattern),
            access,
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().is_none_or(|m| m == method) && self.pattern.matches(path)
    }
}

/// Ordered rule table with a mandatory terminal deny.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<AccessRule>,
}

impl RuleTable {
    /// Build a table; the terminal deny-all entry is always appended.
    pub fn new(mut rules: Vec<AccessRule>) -> Self {
        rules.push(AccessRule::any("/**", RouteAccess::Deny));
        Self { rules }
    }

    /// First matching rule wins.
    pub fn evaluate(&self, method: &Method, path: &str) -> &RouteAccess {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| &rule.access)
            .unwrap_or(&RouteAccess::Deny)
    }

    /// The platform's edge rule table.
    ///
    /// Specific rules come before the general rules that would also match
    /// them (the full-catalog listing before the `{id}` lookup, the
    /// admin-wide order listing before the per-user order routes).
    pub fn commerce_defaults() -> Self {
        Self::new(vec![
            // Preflight and documentation are always public.
            AccessRule::on(Method::OPTIONS, "/**", RouteAccess::Public),
            AccessRule::on(Method::GET, "/docs/**", RouteAccess::Public),
            AccessRule::on(Method::GET, "/v3/api-docs/**", RouteAccess::Public),
            // Authentication surface.
            AccessRule::on(Method::POST, "/auth/login", RouteAccess::Public),
            AccessRule::on(Method::POST, "/auth/refresh", RouteAccess::Public),
            AccessRule::on(Method::GET, "/.well-known/jwks.json", RouteAccess::Public),
            AccessRule::on(Method::POST, "/auth/logout", RouteAccess::Authenticated),
            AccessRule::on(Method::GET, "/auth/me", RouteAccess::Authenticated),
            // Product service: admin sees the full catalog, the storefront
            // lookups are public, mutations are dealer-only.
            AccessRule::on(
                Method::GET,
                "/api/product/products",
                RouteAccess::Role(Role::Admin),
            ),
            AccessRule::on(Method::GET, "/api/product/categories", RouteAccess::Public),
            AccessRule::on(Method::GET, "/api/product/{id}", RouteAccess::Public),
            AccessRule::any("/api/product/**", RouteAccess::Role(Role::Dealer)),
            // Order service.
            AccessRule::on(Method::GET, "/api/order/all", RouteAccess::Role(Role::Admin)),
            AccessRule::any("/api/order/**", RouteAccess::Authenticated),
            // Cart service.
            AccessRule::any("/api/cart/**", RouteAccess::Authenticated),
            // User service.
            AccessRule::on(
                Method::DELETE,
                "/api/user/{id}",
                RouteAccess::Role(Role::Admin),
            ),
            AccessRule::any("/api/user/**", RouteAccess::Authenticated),
            // Warranty service.
            AccessRule::any("/api/warranty/**", RouteAccess::Authenticated),
            // Media service: uploads are dealer-only, reads are public.
            AccessRule::on(
                Method::POST,
                "/api/media/upload",
                RouteAccess::Role(Role::Dealer),
            ),
            AccessRule::on(Method::GET, "/api/media/{id}", RouteAccess::Public),
            // Notification service.
            AccessRule::any("/api/notification/**", RouteAccess::Authenticated),
            // Report service.
            AccessRule::any("/api/report/**", RouteAccess::Role(Role::Admin)),
        ])
    }
}
