// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential hashing and verification.
//!
//! Passwords are stored as Argon2id PHC strings. Verification goes through
//! the `argon2` verifier, which performs a constant-time comparison; a
//! plaintext equality check never appears anywhere in this module.
//!
//! Unknown username and wrong password produce the same
//! [`AuthError::InvalidCredentials`] so responses cannot be used for
//! username enumeration.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use super::error::AuthError;
use crate::store::{Principal, PrincipalStore};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Password hashing failure.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters long")]
    TooShort,
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Hash a password with a freshly generated random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(PasswordError::TooShort);
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hashing(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string.
///
/// Any failure (unparseable hash, mismatch) is an ordinary `false`.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Check a presented username/password pair against the store and return the
/// verified principal.
///
/// Read-only; token issuance is the caller's job.
pub fn authenticate(
    store: &PrincipalStore,
    username: &str,
    password: &str,
) -> Result<Principal, AuthError> {
    let principal = store.get(username).ok_or(AuthError::InvalidCredentials)?;
    if !verify_password(password, principal.password_hash()) {
        return Err(AuthError::InvalidCredentials);
    }
    Ok(principal.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::Role;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(matches!(hash_password("short"), Err(PasswordError::TooShort)));
        assert!(matches!(hash_password(""), Err(PasswordError::TooShort)));
    }

    #[test]
    fn unparseable_stored_hash_is_just_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("same password").expect("hash");
        let b = hash_password("same password").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn unknown_user_and_wrong_password_are_indistinguishable() {
        let mut store = PrincipalStore::new();
        store
            .create("alice", &hash_password("password123").unwrap(), vec![Role::Admin])
            .expect("create");

        let unknown = authenticate(&store, "nobody", "password123").unwrap_err();
        let wrong = authenticate(&store, "alice", "wrong-password").unwrap_err();
        assert_eq!(unknown.to_string(), "Invalid username or password");
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[test]
    fn good_credentials_return_the_principal() {
        let mut store = PrincipalStore::new();
        store
            .create("alice", &hash_password("password123").unwrap(), vec![Role::Admin])
            .expect("create");

        let principal = authenticate(&store, "alice", "password123").expect("authenticate");
        assert_eq!(principal.username(), "alice");
        assert_eq!(principal.roles(), &[Role::Admin]);
    }
}
