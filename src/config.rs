// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ACCESS_TOKEN_TTL_SECS` | Access-token lifetime (drives `expiresIn`) | `86400` |
//! | `REFRESH_TOKEN_TTL_SECS` | Refresh-token lifetime | `604800` |
//! | `GATEWAY_MARKER` | Value of the gateway-origin marker header | `relational-gateway` |
//! | `ACCOUNT_SERVICE_PEER` | Peer name allowed to manage accounts | `user-service` |
//! | `SEED_ADMIN_USERNAME` | Seed admin account at startup | unset |
//! | `SEED_ADMIN_PASSWORD` | Password for the seed admin account | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::time::Duration;

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the access-token lifetime in seconds.
pub const ACCESS_TOKEN_TTL_ENV: &str = "ACCESS_TOKEN_TTL_SECS";

/// Environment variable name for the refresh-token lifetime in seconds.
pub const REFRESH_TOKEN_TTL_ENV: &str = "REFRESH_TOKEN_TTL_SECS";

/// Environment variable name for the gateway marker header value.
pub const GATEWAY_MARKER_ENV: &str = "GATEWAY_MARKER";

/// Environment variable name for the account-management peer service.
pub const ACCOUNT_SERVICE_PEER_ENV: &str = "ACCOUNT_SERVICE_PEER";

/// Environment variable names for the optional seed admin account.
pub const SEED_ADMIN_USERNAME_ENV: &str = "SEED_ADMIN_USERNAME";
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";

/// Default access-token lifetime for this deployment's login contract.
///
/// The issuer's own built-in default is 30 minutes; the platform's login
/// response promises `expiresIn: 86400`, so the service config defaults to
/// a day and deployments shorten it from the environment.
const DEFAULT_ACCESS_TTL_SECS: u64 = 86_400;

/// Default refresh-token lifetime (7 days).
const DEFAULT_REFRESH_TTL_SECS: u64 = 604_800;

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// Access-token lifetime.
    pub access_ttl: Duration,
    /// Refresh-token lifetime.
    pub refresh_ttl: Duration,
    /// Expected value of the gateway-origin marker header.
    pub gateway_marker: String,
    /// Peer service name allowed on the account-management channel.
    pub account_service_peer: String,
}

impl AppConfig {
    /// Load configuration from the environment, applying defaults.
    pub fn from_env() -> Self {
        Self {
            host: env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var(PORT_ENV)
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            access_ttl: Duration::from_secs(
                env::var(ACCESS_TOKEN_TTL_ENV)
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_ACCESS_TTL_SECS),
            ),
            refresh_ttl: Duration::from_secs(
                env::var(REFRESH_TOKEN_TTL_ENV)
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_REFRESH_TTL_SECS),
            ),
            gateway_marker: env::var(GATEWAY_MARKER_ENV)
                .unwrap_or_else(|_| "relational-gateway".to_string()),
            account_service_peer: env::var(ACCOUNT_SERVICE_PEER_ENV)
                .unwrap_or_else(|_| "user-service".to_string()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            access_ttl: Duration::from_secs(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::from_secs(DEFAULT_REFRESH_TTL_SECS),
            gateway_marker: "relational-gateway".to_string(),
            account_service_peer: "user-service".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_login_contract() {
        let config = AppConfig::default();
        assert_eq!(config.access_ttl, Duration::from_secs(86_400));
        assert_eq!(config.refresh_ttl, Duration::from_secs(604_800));
        assert_eq!(config.account_service_peer, "user-service");
    }
}
