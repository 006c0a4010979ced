// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Policy Module
//!
//! The two layered decision points of the platform:
//!
//! - [`gateway`] - the edge policy the API gateway evaluates per inbound
//!   request: ordered route rules, token verification, role checks
//! - [`internal`] - the per-service policy for non-gateway traffic:
//!   gateway-marker and service-peer trust channels with deny-by-default
//!
//! The gateway does the real authentication once; downstream services do
//! cheap header-based trust checks. Both layers share the [`rules`] path
//! matcher.

pub mod gateway;
pub mod internal;
pub mod rules;

pub use gateway::{GatewayDecision, GatewayPolicy};
pub use internal::{InternalCaller, InternalChannel, InternalPolicy};
pub use rules::{AccessRule, PathPattern, RouteAccess, RuleTable};
