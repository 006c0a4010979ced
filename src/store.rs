// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory principal store.
//!
//! Principals (stored identities) are the one mutable structure in this
//! service. Business entities live in their own services; only the
//! credential records needed for authentication are kept here, behind the
//! `RwLock` in [`crate::state::AppState`].

use std::collections::HashMap;

use crate::auth::roles::Role;

/// Store failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("account '{0}' already exists")]
    AlreadyExists(String),
    #[error("account '{0}' not found")]
    NotFound(String),
}

/// A stored identity: numeric ID, unique username, salted password hash,
/// role set, and an enabled flag. Disabled accounts cannot log in or
/// refresh.
#[derive(Debug, Clone)]
pub struct Principal {
    id: u64,
    username: String,
    password_hash: String,
    roles: Vec<Role>,
    enabled: bool,
}

impl Principal {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// PHC-format Argon2id hash. Never leaves the process.
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// In-memory account registry keyed by username.
#[derive(Default)]
pub struct PrincipalStore {
    principals: HashMap<String, Principal>,
    next_id: u64,
}

impl PrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account. The password must already be hashed.
    pub fn create(
        &mut self,
        username: &str,
        password_hash: &str,
        roles: Vec<Role>,
    ) -> Result<Principal, StoreError> {
        if self.principals.contains_key(username) {
            return Err(StoreError::AlreadyExists(username.to_string()));
        }

        self.next_id += 1;
        let principal = Principal {
            id: self.next_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            roles,
            enabled: true,
        };
        self.principals
            .insert(username.to_string(), principal.clone());
        Ok(principal)
    }

    /// Look up an account by username.
    pub fn get(&self, username: &str) -> Option<&Principal> {
        self.principals.get(username)
    }

    /// Remove an account, returning the removed record.
    pub fn delete(&mut self, username: &str) -> Result<Principal, StoreError> {
        self.principals
            .remove(username)
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }

    /// Enable or disable an account.
    pub fn set_enabled(&mut self, username: &str, enabled: bool) -> Result<(), StoreError> {
        match self.principals.get_mut(username) {
            Some(principal) => {
                principal.enabled = enabled;
                Ok(())
            }
            None => Err(StoreError::NotFound(username.to_string())),
        }
    }

    /// Number of stored accounts.
    pub fn count(&self) -> usize {
        self.principals.len()
    }
}
