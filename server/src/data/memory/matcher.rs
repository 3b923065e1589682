//! Evaluation of compiled predicates and sort specs against JSON documents

use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::core::constants::REGEX_SIZE_LIMIT;
use crate::data::error::DataError;
use crate::domain::query::{CompiledPredicate, CompiledSort, FieldPredicate, FieldSet, SortOrder};

/// Sort key used when the client supplies none
const DEFAULT_SORT_FIELD: &str = "createDate";

enum ValueTest {
    Eq(String),
    Ne(String),
    Regex(Regex),
}

struct FieldMatcher {
    path: String,
    test: ValueTest,
}

impl FieldMatcher {
    fn matches(&self, doc: &Value) -> bool {
        let value = lookup(doc, &self.path);
        match &self.test {
            ValueTest::Eq(expected) => value.is_some_and(|v| scalar_eq(v, expected)),
            // a missing field is "not equal"
            ValueTest::Ne(expected) => !value.is_some_and(|v| scalar_eq(v, expected)),
            ValueTest::Regex(re) => value.and_then(Value::as_str).is_some_and(|s| re.is_match(s)),
        }
    }
}

/// A predicate with regexes compiled once per query
pub(super) struct PredicateMatcher {
    all: Vec<FieldMatcher>,
    any_of: Vec<Vec<FieldMatcher>>,
}

impl PredicateMatcher {
    pub(super) fn compile(predicate: &CompiledPredicate) -> Result<Self, DataError> {
        let all = compile_set(predicate.fields())?;
        let any_of = predicate
            .any_of()
            .iter()
            .map(compile_set)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { all, any_of })
    }

    /// All top-level fields match, and at least one `$or` branch matches
    /// when any are present. An empty branch matches every document.
    pub(super) fn matches(&self, doc: &Value) -> bool {
        self.all.iter().all(|m| m.matches(doc))
            && (self.any_of.is_empty()
                || self
                    .any_of
                    .iter()
                    .any(|branch| branch.iter().all(|m| m.matches(doc))))
    }
}

fn compile_set(set: &FieldSet) -> Result<Vec<FieldMatcher>, DataError> {
    set.iter()
        .map(|(path, predicate)| {
            let test = match predicate {
                FieldPredicate::Eq(v) => ValueTest::Eq(v.clone()),
                FieldPredicate::Ne(v) => ValueTest::Ne(v.clone()),
                FieldPredicate::Regex(pattern) => ValueTest::Regex(
                    RegexBuilder::new(pattern)
                        .size_limit(REGEX_SIZE_LIMIT)
                        .build()
                        .map_err(|e| {
                            tracing::debug!(field = %path, error = %e, "Invalid regex in filter");
                            DataError::invalid_query(format!("invalid pattern for {}", path))
                        })?,
                ),
            };
            Ok(FieldMatcher {
                path: path.clone(),
                test,
            })
        })
        .collect()
}

/// Resolve a dotted path (`curStatus.status`) inside a document
pub(super) fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |current, key| current.get(key))
}

fn scalar_eq(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Number(n) => n.to_string() == expected,
        Value::Bool(b) => b.to_string() == expected,
        _ => false,
    }
}

/// Compare two documents by the sort spec, falling back to `createDate` descending
pub(super) fn compare_docs(a: &Value, b: &Value, sort: &CompiledSort) -> Ordering {
    if sort.is_empty() {
        return compare_field(a, b, DEFAULT_SORT_FIELD, SortOrder::Desc);
    }
    sort.iter()
        .map(|(field, order)| compare_field(a, b, field, order))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn compare_field(a: &Value, b: &Value, field: &str, order: SortOrder) -> Ordering {
    let ord = compare_values(lookup(a, field), lookup(b, field));
    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

/// Missing values sort first; numbers numerically; strings lexically
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .zip(y.as_f64())
            .and_then(|(x, y)| x.partial_cmp(&y))
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => type_rank(x).cmp(&type_rank(y)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}
