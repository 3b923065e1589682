//! Query parameter errors

use std::fmt;

use thiserror::Error;

/// Which query parameter an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Filter,
    Order,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Filter => write!(f, "filter"),
            ParamKind::Order => write!(f, "order"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// Not percent-decodable, not JSON, or not the expected shape
    #[error("{kind} parameter format is not valid")]
    InvalidFormat { kind: ParamKind, reason: String },

    /// Input exceeds a configured resource limit
    #[error("{kind} parameter exceeds {limit} limit of {max}")]
    LimitExceeded {
        kind: ParamKind,
        limit: &'static str,
        max: usize,
    },

    /// Strict mode: two conditions in one item target the same field
    #[error("filter repeats field '{0}' within one condition group")]
    DuplicateField(String),
}

impl QueryError {
    pub fn invalid_format(kind: ParamKind, reason: impl ToString) -> Self {
        Self::InvalidFormat {
            kind,
            reason: reason.to_string(),
        }
    }

    pub fn limit_exceeded(kind: ParamKind, limit: &'static str, max: usize) -> Self {
        Self::LimitExceeded { kind, limit, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_format_hides_reason() {
        let err = QueryError::invalid_format(ParamKind::Order, "expected `,` at line 1");
        assert_eq!(err.to_string(), "order parameter format is not valid");
    }

    #[test]
    fn limit_exceeded_display() {
        let err = QueryError::limit_exceeded(ParamKind::Filter, "depth", 8);
        assert_eq!(err.to_string(), "filter parameter exceeds depth limit of 8");
    }
}
