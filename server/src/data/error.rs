//! Unified error type for data layer

use thiserror::Error;

/// Unified error type for data layer operations
#[derive(Error, Debug)]
pub enum DataError {
    /// Record addressed by id does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Query could not be executed as given (e.g., invalid regex)
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Document (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DataError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery(reason.into())
    }

    /// Whether the error was caused by client input rather than the backend
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            DataError::not_found("survey abc").to_string(),
            "Not found: survey abc"
        );
        assert_eq!(
            DataError::invalid_query("bad regex").to_string(),
            "Invalid query: bad regex"
        );
    }

    #[test]
    fn test_is_client_error() {
        assert!(DataError::invalid_query("x").is_client_error());
        assert!(!DataError::Conflict("x".into()).is_client_error());
        assert!(!DataError::not_found("x").is_client_error());
    }
}
