//! JWT session tokens

use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::core::constants::DEFAULT_SESSION_TTL_DAYS;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum JwtError {
    #[error("Session token has expired")]
    Expired,
    #[error("Invalid session token signature")]
    InvalidSignature,
    #[error("Invalid session token: {0}")]
    Invalid(String),
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username the session acts as
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub auth_method: String,
}

impl SessionClaims {
    pub fn new(username: &str, auth_method: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
            auth_method: auth_method.to_string(),
        }
    }

    pub fn username(&self) -> &str {
        &self.sub
    }
}

/// Sign a session token with the default lifetime
pub fn create_session_token(signing_key: &[u8], username: &str, auth_method: &str) -> Result<String> {
    let ttl = Duration::days(i64::from(DEFAULT_SESSION_TTL_DAYS));
    sign(signing_key, &SessionClaims::new(username, auth_method, ttl))
}

fn sign(signing_key: &[u8], claims: &SessionClaims) -> Result<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| anyhow!("Failed to create JWT: {}", e))
}

/// Verify signature and expiry, returning the claims
pub fn validate_session_token(token: &str, signing_key: &[u8]) -> Result<SessionClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<SessionClaims>(token, &DecodingKey::from_secret(signing_key), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::Invalid(e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> Vec<u8> {
        vec![byte; 32]
    }

    #[test]
    fn test_round_trip_claims() {
        let token = create_session_token(&key(0), "alice", "bootstrap").unwrap();
        let claims = validate_session_token(&token, &key(0)).unwrap();
        assert_eq!(claims.username(), "alice");
        assert_eq!(claims.auth_method, "bootstrap");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = create_session_token(&key(0), "alice", "bootstrap").unwrap();
        assert_eq!(
            validate_session_token(&token, &key(1)).unwrap_err(),
            JwtError::InvalidSignature
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = SessionClaims::new("alice", "bootstrap", Duration::seconds(-60));
        let token = sign(&key(0), &claims).unwrap();
        assert_eq!(
            validate_session_token(&token, &key(0)).unwrap_err(),
            JwtError::Expired
        );
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            validate_session_token("not-a-jwt", &key(0)),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_unique_jti() {
        let ttl = Duration::days(1);
        let a = SessionClaims::new("alice", "bootstrap", ttl);
        let b = SessionClaims::new("alice", "bootstrap", ttl);
        assert_ne!(a.jti, b.jti);
    }
}
