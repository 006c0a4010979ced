// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Token issuance, key management, and credential verification for the
//! Relational Commerce platform.
//!
//! ## Auth Flow
//!
//! 1. A client authenticates once against `POST /auth/login`
//! 2. The service verifies credentials and mints an access + refresh pair,
//!    signed with the per-process RSA key (`RS256`, kid in the header)
//! 3. Every subsequent call carries `Authorization: Bearer <access token>`
//! 4. Validators verify against the key set published at
//!    `/.well-known/jwks.json` - in-process for this service, fetched over
//!    HTTP for everyone else
//! 5. When the access token expires, the client trades its refresh token
//!    for a new one at `POST /auth/refresh`
//!
//! ## Security
//!
//! - The private key never leaves process memory; rotation is a restart
//! - Access and refresh tokens are separated by an explicit `token_type`
//!   claim checked on every validation
//! - Credential failures are uniform ("Invalid username or password")
//! - Key-set fetch failures fail closed
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod keys;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::{AuthenticatedUser, Claims, TokenType};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth};
pub use jwks::RemoteKeySet;
pub use keys::SigningKeys;
pub use roles::Role;
pub use token::{ClaimSet, TokenIssuer, TokenValidator};
