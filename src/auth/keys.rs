// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-process signing key material.
//!
//! The service generates one RSA-2048 keypair at startup and holds it in
//! memory for its entire lifetime. Nothing is ever written to disk, there is
//! no rotation while running (rotation = process restart), and every token
//! issued carries the pair's key ID in its header so validators can stay
//! unambiguous during a rolling restart.
//!
//! The keypair is an explicitly constructed immutable value owned by
//! [`crate::state::AppState`] and injected into the issuer and validator -
//! no globals, no locks on the read path.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{DecodingKey, EncodingKey};
use rsa::pkcs1::{EncodeRsaPrivateKey, LineEnding};
use rsa::{traits::PublicKeyParts, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

/// RSA modulus size for generated signing keys.
const RSA_BITS: usize = 2048;

/// Key generation failure. Fatal at startup - the process must not serve
/// requests without a valid keypair, and there is no fallback.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("RSA key generation failed: {0}")]
    Generation(#[from] rsa::Error),
    #[error("private key encoding failed: {0}")]
    Encoding(#[from] rsa::pkcs1::Error),
    #[error("key material rejected: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// A single published verification key in JWKS form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishedJwk {
    /// Key type (always `RSA`)
    pub kty: String,
    /// Key use (always `sig`)
    #[serde(rename = "use")]
    pub key_use: String,
    /// Key ID carried in token headers
    pub kid: String,
    /// Intended algorithm (always `RS256`)
    pub alg: String,
    /// Modulus, base64url without padding
    pub n: String,
    /// Public exponent, base64url without padding
    pub e: String,
}

/// The key-set document served on the unauthenticated publication endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeySetDocument {
    pub keys: Vec<PublishedJwk>,
}

/// The process's signing keypair plus its published public form.
///
/// Exactly one of these exists per authentication-service instance; it is
/// written once before request handling begins and read-only thereafter.
pub struct SigningKeys {
    kid: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    public_jwk: PublishedJwk,
}

impl SigningKeys {
    /// Generate a fresh keypair with a random key ID.
    ///
    /// Called once at startup; the caller treats any error as fatal.
    pub fn generate() -> Result<Self, KeyError> {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, RSA_BITS)?;
        let public: RsaPublicKey = private.to_public_key();

        let n = base64url(&bigint_to_bytes_be(public.n()));
        let e = base64url(&bigint_to_bytes_be(public.e()));
        let kid = uuid::Uuid::new_v4().to_string();

        let pem = private.to_pkcs1_pem(LineEnding::LF)?;
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes())?;
        let decoding_key = DecodingKey::from_rsa_components(&n, &e)?;

        let public_jwk = PublishedJwk {
            kty: "RSA".to_string(),
            key_use: "sig".to_string(),
            kid: kid.clone(),
            alg: "RS256".to_string(),
            n,
            e,
        };

        Ok(Self {
            kid,
            encoding_key,
            decoding_key,
            public_jwk,
        })
    }

    /// Key ID of the active pair.
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// Private signing key. Used only by the in-process token issuer.
    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Public verification key. Used only by the in-process validator.
    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// The key-set document to publish.
    pub fn key_set_document(&self) -> KeySetDocument {
        KeySetDocument {
            keys: vec![self.public_jwk.clone()],
        }
    }
}

fn base64url(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// JWK expects an unsigned big-endian integer with no leading zero octets.
fn bigint_to_bytes_be(n: &rsa::BigUint) -> Vec<u8> {
    let mut bytes = n.to_bytes_be();
    while bytes.first().is_some_and(|b| *b == 0) {
        bytes.remove(0);
    }
    bytes
}

#[cfg(test)]
pub(crate) mod testkeys {
    use std::sync::{Arc, OnceLock};

    use super::SigningKeys;

    static KEYS: OnceLock<Arc<SigningKeys>> = OnceLock::new();

    /// Shared keypair for the test binary. RSA generation is slow enough
    /// that every test reusing one pair keeps the suite fast.
    pub(crate) fn shared() -> Arc<SigningKeys> {
        KEYS.get_or_init(|| Arc::new(SigningKeys::generate().expect("test key generation")))
            .clone()
    }
}
