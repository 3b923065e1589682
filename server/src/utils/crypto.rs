//! Cryptographic utility functions

use anyhow::{Result, bail};
use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};
use subtle::ConstantTimeEq;

/// Minimum signing key length in bytes
const MIN_SIGNING_KEY_LEN: usize = 32;

/// Generate a cryptographically secure random key
pub fn generate_key(len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

/// Generate a 256-bit (32 byte) signing key
pub fn generate_signing_key() -> Vec<u8> {
    generate_key(MIN_SIGNING_KEY_LEN)
}

/// Decode a hex-encoded signing key, enforcing the minimum length
pub fn decode_signing_key(encoded: &str) -> Result<Vec<u8>> {
    let key = hex::decode(encoded.trim())?;
    if key.len() < MIN_SIGNING_KEY_LEN {
        bail!(
            "Signing key must be at least {} bytes, got {}",
            MIN_SIGNING_KEY_LEN,
            key.len()
        );
    }
    Ok(key)
}

/// Generate a cryptographically secure random hex token
pub fn generate_token(byte_len: usize) -> String {
    hex::encode(generate_key(byte_len))
}

/// Generate a 24-char hex document id
pub fn generate_id() -> String {
    generate_token(12)
}

/// Generate a random alphanumeric string (for public short paths)
pub fn generate_short_code(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Constant-time string comparison to prevent timing attacks
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key_length() {
        assert_eq!(generate_key(16).len(), 16);
        assert_eq!(generate_signing_key().len(), 32);
    }

    #[test]
    fn test_decode_signing_key() {
        let key = generate_signing_key();
        assert_eq!(decode_signing_key(&hex::encode(&key)).unwrap(), key);
        assert!(decode_signing_key("abcd").is_err());
        assert!(decode_signing_key("zz").is_err());
    }

    #[test]
    fn test_generate_token() {
        let token = generate_token(32);
        assert_eq!(token.len(), 64); // 32 bytes = 64 hex chars
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token(32));
    }

    #[test]
    fn test_generate_id() {
        let id = generate_id();
        assert_eq!(id.len(), 24);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_short_code() {
        let code = generate_short_code(8);
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("hello", "hello"));
        assert!(!constant_time_eq("hello", "world"));
        assert!(!constant_time_eq("hello", "hell"));
        assert!(constant_time_eq("", ""));
    }
}
