// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and validation.
//!
//! Both token types are signed with the same per-process RSA key; the
//! `token_type` claim is the only thing separating an access token from a
//! refresh token, so every validation path checks it explicitly. Expiry is
//! deliberately not enforced by [`TokenValidator::parse_claims`] - each flow
//! decides its own expiry policy, and the one allow-expired path (refresh)
//! still gets a full signature check.
//!
//! Issuance and validation are pure functions over their inputs plus the
//! immutable key material; they run fully in parallel with no coordination.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, Header, Validation};

use super::claims::{Claims, TokenType, CLOCK_SKEW_LEEWAY};
use super::error::AuthError;
use super::jwks::RemoteKeySet;
use super::keys::SigningKeys;
use super::roles::Role;

/// Default access-token lifetime (30 minutes).
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(30 * 60);

/// Default refresh-token lifetime (7 days).
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Claim bag attached to an issued token: the typed fields every consumer
/// depends on plus an open extension map.
#[derive(Debug, Clone, Default)]
pub struct ClaimSet {
    /// Roles to embed (bare names, no prefix)
    pub roles: Vec<Role>,
    /// Numeric principal ID
    pub user_id: u64,
    /// Additional claims this service does not interpret
    pub extra: HashMap<String, serde_json::Value>,
}

impl ClaimSet {
    pub fn new(roles: Vec<Role>, user_id: u64) -> Self {
        Self {
            roles,
            user_id,
            extra: HashMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Mints signed, time-bounded tokens.
pub struct TokenIssuer {
    keys: Arc<SigningKeys>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer with the default lifetimes.
    pub fn new(keys: Arc<SigningKeys>) -> Self {
        Self {
            keys,
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
        }
    }

    /// Override the token lifetimes.
    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    /// Configured access-token lifetime (drives `expiresIn` in responses).
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Mint an access token for `subject`.
    pub fn issue_access_token(&self, subject: &str, claims: ClaimSet) -> Result<String, AuthError> {
        self.issue(subject, TokenType::Access, self.access_ttl, claims)
    }

    /// Mint a refresh token for `subject`.
    pub fn issue_refresh_token(&self, subject: &str, claims: ClaimSet) -> Result<String, AuthError> {
        self.issue(subject, TokenType::Refresh, self.refresh_ttl, claims)
    }

    fn issue(
        &self,
        subject: &str,
        token_type: TokenType,
        ttl: Duration,
        claims: ClaimSet,
    ) -> Result<String, AuthError> {
        if subject.is_empty() {
            return Err(AuthError::Signing("token subject must be non-empty".into()));
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
            token_type,
            roles: claims.roles.iter().map(|r| r.as_str().to_string()).collect(),
            user_id: claims.user_id,
            extra: claims.extra,
        };

        // The active kid rides in every header so validators stay
        // unambiguous if two kids are ever live during a rolling restart.
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.keys.kid().to_string());

        encode(&header, &claims, self.keys.encoding_key())
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}

/// Where a validator's verification keys come from.
///
/// The authentication service itself verifies against its in-process
/// keypair; every other service verifies against the published key set.
#[derive(Clone)]
pub enum KeyProvider {
    /// In-process keypair (issuer side)
    Local(Arc<SigningKeys>),
    /// Published key set fetched over HTTP (downstream side)
    Remote(RemoteKeySet),
}

impl KeyProvider {
    async fn decoding_key(&self, kid: Option<&str>) -> Result<(DecodingKey, Algorithm), AuthError> {
        match self {
            KeyProvider::Local(keys) => match kid {
                Some(k) if k != keys.kid() => Err(AuthError::NoMatchingKey),
                _ => Ok((keys.decoding_key().clone(), Algorithm::RS256)),
            },
            KeyProvider::Remote(remote) => match kid {
                Some(k) => remote.get_decoding_key(k).await,
                None => remote.get_any_decoding_key().await,
            },
        }
    }
}

/// Verifies and decodes tokens. Never mutates state.
#[derive(Clone)]
pub struct TokenValidator {
    keys: KeyProvider,
}

impl TokenValidator {
    /// Validator backed by the in-process keypair.
    pub fn local(keys: Arc<SigningKeys>) -> Self {
        Self {
            keys: KeyProvider::Local(keys),
        }
    }

    /// Validator backed by the published key set.
    pub fn remote(keys: RemoteKeySet) -> Self {
        Self {
            keys: KeyProvider::Remote(keys),
        }
    }

    /// Verify signature and structure, and decode the claims.
    ///
    /// Expiry is not enforced here; callers apply their flow's policy via
    /// the `validate_*` methods. Structural and cryptographic failures are
    /// reported uniformly as [`AuthError::InvalidToken`].
    pub async fn parse_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::InvalidToken)?;
        let (decoding_key, algorithm) = self.keys.decoding_key(header.kid.as_deref()).await?;

        let mut validation = Validation::new(algorithm);
        validation.leeway = CLOCK_SKEW_LEEWAY as u64;
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(data.claims)
    }

    /// General-purpose check used by login/refresh flows: signature, access
    /// type, subject match, and (unless `allow_expired`) non-expiry.
    ///
    /// `allow_expired` only relaxes the expiry comparison; the signature
    /// check is never skipped.
    pub async fn validate_for_authentication(
        &self,
        token: &str,
        expected_subject: &str,
        allow_expired: bool,
    ) -> Result<Claims, AuthError> {
        let claims = self.parse_claims(token).await?;
        if claims.token_type != TokenType::Access {
            return Err(AuthError::WrongTokenType);
        }
        if claims.sub != expected_subject {
            return Err(AuthError::SubjectMismatch);
        }
        if !allow_expired && claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    /// Strict refresh-token check: refresh type, subject match, and never
    /// expired. Anything that isn't exactly a live, correctly-typed,
    /// subject-matching refresh token is rejected.
    pub async fn validate_refresh_token(
        &self,
        token: &str,
        expected_subject: &str,
    ) -> Result<Claims, AuthError> {
        let claims = self.parse_claims(token).await?;
        if claims.token_type != TokenType::Refresh {
            return Err(AuthError::WrongTokenType);
        }
        if claims.sub != expected_subject {
            return Err(AuthError::SubjectMismatch);
        }
        if claims.is_expired() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    /// Boolean form of [`Self::validate_for_authentication`]. Malformed
    /// input is an ordinary `false`, never a propagated fault.
    pub async fn is_token_valid(
        &self,
        token: &str,
        expected_subject: &str,
        allow_expired: bool,
    ) -> bool {
        self.validate_for_authentication(token, expected_subject, allow_expired)
            .await
            .is_ok()
    }

    /// Boolean form of [`Self::validate_refresh_token`].
    pub async fn is_refresh_token_valid(&self, token: &str, expected_subject: &str) -> bool {
        self.validate_refresh_token(token, expected_subject)
            .await
            .is_ok()
    }
}
