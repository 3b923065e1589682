//! Resource limits for client-supplied filter trees

use super::error::{ParamKind, QueryError};
use super::types::{ConditionValue, FilterItem};
use crate::core::constants::{
    DEFAULT_QUERY_MAX_CONDITIONS, DEFAULT_QUERY_MAX_DEPTH, DEFAULT_QUERY_MAX_PARAM_BYTES,
    JSON_LEVELS_PER_FILTER_DEPTH, MAX_QUERY_DEPTH,
};

/// Bounds applied before a filter tree is compiled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    /// Maximum nesting of filter item lists (top level is depth 1)
    pub max_depth: usize,
    /// Maximum number of conditions across the whole tree
    pub max_conditions: usize,
    /// Maximum raw (still encoded) parameter length in bytes
    pub max_param_bytes: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_QUERY_MAX_DEPTH,
            max_conditions: DEFAULT_QUERY_MAX_CONDITIONS,
            max_param_bytes: DEFAULT_QUERY_MAX_PARAM_BYTES,
        }
    }
}

impl QueryLimits {
    /// Depth bound actually enforced; never above what the JSON parser can nest
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.min(MAX_QUERY_DEPTH)
    }

    /// Reject decoded filter text nested deeper than any allowed tree.
    ///
    /// Runs before deserialization so overly deep input reports the depth
    /// limit rather than a parser recursion error.
    pub fn check_json_nesting(&self, decoded: &str) -> Result<(), QueryError> {
        let max_depth = self.effective_max_depth();
        let budget = max_depth * JSON_LEVELS_PER_FILTER_DEPTH;
        let mut nesting = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for byte in decoded.bytes() {
            if in_string {
                match byte {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match byte {
                b'"' => in_string = true,
                b'[' | b'{' => {
                    nesting += 1;
                    if nesting > budget {
                        return Err(QueryError::limit_exceeded(
                            ParamKind::Filter,
                            "depth",
                            max_depth,
                        ));
                    }
                }
                b']' | b'}' => nesting = nesting.saturating_sub(1),
                _ => {}
            }
        }
        Ok(())
    }

    /// Walk the tree iteratively and fail on the first exceeded bound
    pub fn check_filter(&self, items: &[FilterItem]) -> Result<(), QueryError> {
        let max_depth = self.effective_max_depth();
        let mut pending: Vec<(&[FilterItem], usize)> = vec![(items, 1)];
        let mut conditions = 0usize;

        while let Some((level, depth)) = pending.pop() {
            if depth > max_depth {
                return Err(QueryError::limit_exceeded(
                    ParamKind::Filter,
                    "depth",
                    max_depth,
                ));
            }
            for item in level {
                conditions += item.condition.len();
                if conditions > self.max_conditions {
                    return Err(QueryError::limit_exceeded(
                        ParamKind::Filter,
                        "condition count",
                        self.max_conditions,
                    ));
                }
                for condition in &item.condition {
                    if let Some(ConditionValue::Nested(children)) = &condition.value {
                        pending.push((children, depth + 1));
                    }
                }
            }
        }
        Ok(())
    }

    /// Reject raw parameter text above the byte limit
    pub fn check_param_len(&self, kind: ParamKind, raw: &str) -> Result<(), QueryError> {
        if raw.len() > self.max_param_bytes {
            return Err(QueryError::limit_exceeded(
                kind,
                "size",
                self.max_param_bytes,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::types::FilterCondition;

    fn nested(depth: usize) -> Vec<FilterItem> {
        let mut items = vec![FilterItem::all(vec![FilterCondition::eq("title", "x")])];
        for _ in 1..depth {
            items = vec![FilterItem::all(vec![FilterCondition {
                field: Some("title".into()),
                comparator: None,
                value: Some(ConditionValue::Nested(items)),
            }])];
        }
        items
    }

    #[test]
    fn depth_within_limit() {
        let limits = QueryLimits {
            max_depth: 3,
            ..Default::default()
        };
        assert!(limits.check_filter(&nested(3)).is_ok());
    }

    #[test]
    fn depth_over_limit() {
        let limits = QueryLimits {
            max_depth: 3,
            ..Default::default()
        };
        assert_eq!(
            limits.check_filter(&nested(4)),
            Err(QueryError::limit_exceeded(ParamKind::Filter, "depth", 3))
        );
    }

    #[test]
    fn condition_count_counts_all_levels() {
        let limits = QueryLimits {
            max_conditions: 3,
            ..Default::default()
        };
        // one condition per level
        assert!(limits.check_filter(&nested(3)).is_ok());
        assert!(matches!(
            limits.check_filter(&nested(4)),
            Err(QueryError::LimitExceeded {
                limit: "condition count",
                ..
            })
        ));
    }

    #[test]
    fn empty_tree_passes() {
        assert!(QueryLimits::default().check_filter(&[]).is_ok());
    }

    #[test]
    fn effective_depth_is_capped() {
        let limits = QueryLimits {
            max_depth: MAX_QUERY_DEPTH * 2,
            ..Default::default()
        };
        assert_eq!(limits.effective_max_depth(), MAX_QUERY_DEPTH);
        assert_eq!(
            limits.check_filter(&nested(MAX_QUERY_DEPTH + 1)),
            Err(QueryError::limit_exceeded(
                ParamKind::Filter,
                "depth",
                MAX_QUERY_DEPTH
            ))
        );
    }

    #[test]
    fn json_nesting_ignores_brackets_in_strings() {
        let limits = QueryLimits {
            max_depth: 1,
            ..Default::default()
        };
        let raw = r#"[{"condition":[{"field":"title","value":"[[[{{\"]]"}]}]"#;
        assert!(limits.check_json_nesting(raw).is_ok());
        assert_eq!(
            limits.check_json_nesting("[[[[[]]]]]"),
            Err(QueryError::limit_exceeded(ParamKind::Filter, "depth", 1))
        );
    }

    #[test]
    fn param_len() {
        let limits = QueryLimits {
            max_param_bytes: 4,
            ..Default::default()
        };
        assert!(limits.check_param_len(ParamKind::Order, "[]").is_ok());
        assert_eq!(
            limits.check_param_len(ParamKind::Order, "[{}, {}]"),
            Err(QueryError::limit_exceeded(ParamKind::Order, "size", 4))
        );
    }
}
