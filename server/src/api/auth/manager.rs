//! Authentication manager

use anyhow::{Context, Result};

use super::jwt::{JwtError, SessionClaims, create_session_token, validate_session_token};
use crate::core::config::AuthConfig;
use crate::core::constants::DEFAULT_USER_ID;
use crate::utils::crypto;

/// Holds the session signing key and the one-process bootstrap token
#[derive(Debug)]
pub struct AuthManager {
    signing_key: Vec<u8>,
    bootstrap_token: String,
    enabled: bool,
}

impl AuthManager {
    /// Use the configured signing key, or a random one that lives as long as the process
    pub fn init(config: &AuthConfig) -> Result<Self> {
        let signing_key = match &config.signing_key {
            Some(key) => crypto::decode_signing_key(key).context("Invalid auth signing key")?,
            None => {
                tracing::debug!("No signing key configured, sessions end with the process");
                crypto::generate_signing_key()
            }
        };

        if config.enabled {
            tracing::debug!("Authentication enabled");
        } else {
            tracing::warn!("Authentication DISABLED");
        }

        Ok(Self {
            signing_key,
            bootstrap_token: crypto::generate_token(32),
            enabled: config.enabled,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Token printed at startup, `None` when auth is off
    pub fn bootstrap_token(&self) -> Option<&str> {
        self.enabled.then_some(self.bootstrap_token.as_str())
    }

    /// Exchange the bootstrap token for a session of the local user
    pub fn exchange_token(&self, token: &str) -> Result<String> {
        if !self.enabled {
            return create_session_token(&self.signing_key, DEFAULT_USER_ID, "disabled");
        }
        if !crypto::constant_time_eq(&self.bootstrap_token, token) {
            anyhow::bail!("Invalid bootstrap token");
        }
        create_session_token(&self.signing_key, DEFAULT_USER_ID, "bootstrap")
    }

    pub fn validate_session(&self, jwt: &str) -> Result<SessionClaims, JwtError> {
        validate_session_token(jwt, &self.signing_key)
    }
}
