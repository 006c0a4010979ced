// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Commerce - Identity & Authorization Service
//!
//! This crate issues and validates the platform's signed tokens, publishes
//! the signing key set, and hosts the layered authorization policy that the
//! API gateway and every downstream service delegate to.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Keys, tokens, credentials, extractors
//! - `policy` - Edge and internal-call authorization decision points
//! - `store` - In-memory principal store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod state;
pub mod store;
