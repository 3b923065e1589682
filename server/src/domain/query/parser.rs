//! Filter and order parameter parsing
//!
//! Clients send both parameters as percent-encoded JSON arrays. Parsing
//! validates size, decodes, deserializes into typed trees, and enforces
//! nesting limits before anything is compiled.

use std::borrow::Cow;

use serde::de::DeserializeOwned;

use super::error::{ParamKind, QueryError};
use super::limits::QueryLimits;
use super::types::{FilterItem, SortRequest};

/// Parse the `filter` query parameter into a filter tree
pub fn parse_filter_param(raw: &str, limits: &QueryLimits) -> Result<Vec<FilterItem>, QueryError> {
    limits.check_param_len(ParamKind::Filter, raw)?;
    let decoded = decode_param(raw, ParamKind::Filter)?;
    limits.check_json_nesting(&decoded)?;
    let items: Vec<FilterItem> = parse_json_array(&decoded, ParamKind::Filter)?;
    limits.check_filter(&items)?;
    Ok(items)
}

/// Parse the `order` query parameter into sort requests
pub fn parse_order_param(raw: &str, limits: &QueryLimits) -> Result<Vec<SortRequest>, QueryError> {
    limits.check_param_len(ParamKind::Order, raw)?;
    let decoded = decode_param(raw, ParamKind::Order)?;
    parse_json_array(&decoded, ParamKind::Order)
}

fn parse_json_array<T: DeserializeOwned>(
    decoded: &str,
    kind: ParamKind,
) -> Result<Vec<T>, QueryError> {
    serde_json::from_str(decoded).map_err(|e| {
        tracing::debug!(param = %kind, error = %e, "Rejected query parameter");
        QueryError::invalid_format(kind, e)
    })
}

/// Percent-decode, rejecting `%` not followed by two hex digits
fn decode_param(raw: &str, kind: ParamKind) -> Result<Cow<'_, str>, QueryError> {
    let bytes = raw.as_bytes();
    for (i, _) in raw.match_indices('%') {
        let escape = bytes.get(i + 1..i + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(QueryError::invalid_format(
                kind,
                format!("malformed percent escape at byte {}", i),
            ));
        }
    }
    urlencoding::decode(raw).map_err(|e| QueryError::invalid_format(kind, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::MAX_QUERY_DEPTH;
    use crate::domain::query::types::Combinator;

    fn limits() -> QueryLimits {
        QueryLimits::default()
    }

    fn nested_filter(depth: usize) -> String {
        let mut raw = r#"[{"condition":[{"field":"title","value":"x"}]}]"#.to_string();
        for _ in 1..depth {
            raw = format!(r#"[{{"condition":[{{"field":"title","value":{}}}]}}]"#, raw);
        }
        raw
    }

    #[test]
    fn parse_filter_plain_json() {
        let raw = r#"[{"condition":[{"field":"title","value":"foo"}]}]"#;
        let items = parse_filter_param(raw, &limits()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].condition[0].field.as_deref(), Some("title"));
    }

    #[test]
    fn parse_filter_percent_encoded() {
        let raw = "%5B%7B%22comparator%22%3A%22%24or%22%2C%22condition%22%3A%5B%5D%7D%5D";
        let items = parse_filter_param(raw, &limits()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].combinator, Combinator::Or);
    }

    #[test]
    fn parse_filter_empty_array() {
        assert!(parse_filter_param("[]", &limits()).unwrap().is_empty());
    }

    #[test]
    fn parse_filter_invalid_json() {
        let err = parse_filter_param("not valid json", &limits()).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidFormat {
                kind: ParamKind::Filter,
                ..
            }
        ));
    }

    #[test]
    fn parse_filter_rejects_non_array() {
        let raw = r#"{"condition":[]}"#;
        assert!(parse_filter_param(raw, &limits()).is_err());
    }

    #[test]
    fn parse_filter_rejects_missing_condition() {
        let raw = r#"[{"comparator":"$or"}]"#;
        assert!(parse_filter_param(raw, &limits()).is_err());
    }

    #[test]
    fn parse_filter_rejects_non_string_scalar_values() {
        for raw in [
            r#"[{"condition":[{"field":"title","value":42}]}]"#,
            r#"[{"condition":[{"field":"title","value":["a","b"]}]}]"#,
        ] {
            assert!(
                matches!(
                    parse_filter_param(raw, &limits()),
                    Err(QueryError::InvalidFormat {
                        kind: ParamKind::Filter,
                        ..
                    })
                ),
                "{}",
                raw
            );
        }
    }

    #[test]
    fn parse_filter_enforces_depth() {
        let raw = r#"[{"condition":[{"field":"title","value":[{"condition":[{"field":"title","value":[{"condition":[]}]}]}]}]}]"#;
        let shallow = QueryLimits {
            max_depth: 2,
            ..Default::default()
        };
        assert!(matches!(
            parse_filter_param(raw, &shallow),
            Err(QueryError::LimitExceeded { limit: "depth", .. })
        ));
        assert!(parse_filter_param(raw, &limits()).is_ok());
    }

    #[test]
    fn parse_filter_enforces_size_before_decoding() {
        let small = QueryLimits {
            max_param_bytes: 8,
            ..Default::default()
        };
        assert!(matches!(
            parse_filter_param("%5B%5D%20%20", &small),
            Err(QueryError::LimitExceeded { limit: "size", .. })
        ));
    }

    #[test]
    fn parse_filter_accepts_depth_at_cap() {
        let capped = QueryLimits {
            max_depth: MAX_QUERY_DEPTH,
            max_conditions: usize::MAX,
            max_param_bytes: usize::MAX,
        };
        let items = parse_filter_param(&nested_filter(MAX_QUERY_DEPTH), &capped).unwrap();
        assert_eq!(items.len(), 1);
        assert!(matches!(
            parse_filter_param(&nested_filter(MAX_QUERY_DEPTH + 1), &capped),
            Err(QueryError::LimitExceeded { limit: "depth", .. })
        ));
    }

    #[test]
    fn parse_filter_deep_input_reports_depth_limit() {
        let generous = QueryLimits {
            max_depth: 64,
            max_conditions: usize::MAX,
            max_param_bytes: usize::MAX,
        };
        for depth in [32, 40, 70, 200] {
            assert_eq!(
                parse_filter_param(&nested_filter(depth), &generous),
                Err(QueryError::limit_exceeded(
                    ParamKind::Filter,
                    "depth",
                    MAX_QUERY_DEPTH
                )),
                "depth {}",
                depth
            );
        }
    }

    #[test]
    fn parse_filter_rejects_malformed_escape() {
        for raw in [
            r#"[{"condition":[{"field":"title","value":"100%zz"}]}]"#,
            r#"[{"condition":[{"field":"title","value":"100%"}]}]"#,
            "%5B%5",
        ] {
            assert!(
                matches!(
                    parse_filter_param(raw, &limits()),
                    Err(QueryError::InvalidFormat {
                        kind: ParamKind::Filter,
                        ..
                    })
                ),
                "{}",
                raw
            );
        }
        let ok = r#"[{"condition":[{"field":"title","value":"100%25"}]}]"#;
        assert!(parse_filter_param(ok, &limits()).is_ok());
    }

    #[test]
    fn parse_order_valid() {
        let raw = r#"[{"field":"createDate","value":1},{"field":"updateDate","value":-1}]"#;
        let sorts = parse_order_param(raw, &limits()).unwrap();
        assert_eq!(sorts.len(), 2);
    }

    #[test]
    fn parse_order_invalid_reports_order_kind() {
        let err = parse_order_param("[{", &limits()).unwrap_err();
        assert_eq!(err.to_string(), "order parameter format is not valid");
    }
}
