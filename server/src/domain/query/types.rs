//! Filter and sort type definitions
//!
//! Input types mirror the JSON shape clients send in the `filter` and `order`
//! query parameters. Output types are the compiled forms handed to the
//! persistence layer.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire token selecting the OR combinator on a filter item
pub const OR_OPERATOR: &str = "$or";

/// Wire token for the not-equal comparator
pub const NOT_EQUAL_OPERATOR: &str = "$ne";

/// Wire token for the regex comparator
pub const REGEX_OPERATOR: &str = "$regex";

// ============================================================================
// Input: filter tree
// ============================================================================

/// How an item's conditions merge into the accumulated predicate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

/// Comparison applied by a single condition. Absence means equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    NotEqual,
    RegexMatch,
}

/// One node of the filter tree
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterItem {
    /// Accepted under `combinator` or the legacy `comparator` key
    #[serde(
        default,
        alias = "comparator",
        deserialize_with = "deserialize_combinator"
    )]
    pub combinator: Combinator,
    pub condition: Vec<FilterCondition>,
}

/// One leaf comparison
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterCondition {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "deserialize_comparator")]
    pub comparator: Option<Comparator>,
    #[serde(default)]
    pub value: Option<ConditionValue>,
}

/// Condition value: a scalar string or a nested filter tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Text(String),
    Nested(Vec<FilterItem>),
}

impl FilterItem {
    /// AND item from conditions
    pub fn all(condition: Vec<FilterCondition>) -> Self {
        Self {
            combinator: Combinator::And,
            condition,
        }
    }

    /// OR item from conditions
    pub fn any(condition: Vec<FilterCondition>) -> Self {
        Self {
            combinator: Combinator::Or,
            condition,
        }
    }
}

impl FilterCondition {
    pub fn eq(field: &str, value: &str) -> Self {
        Self::with_comparator(field, None, value)
    }

    pub fn ne(field: &str, value: &str) -> Self {
        Self::with_comparator(field, Some(Comparator::NotEqual), value)
    }

    pub fn regex(field: &str, value: &str) -> Self {
        Self::with_comparator(field, Some(Comparator::RegexMatch), value)
    }

    fn with_comparator(field: &str, comparator: Option<Comparator>, value: &str) -> Self {
        Self {
            field: Some(field.to_string()),
            comparator,
            value: Some(ConditionValue::Text(value.to_string())),
        }
    }
}

/// Unknown combinator tokens fall back to AND
fn deserialize_combinator<'de, D>(deserializer: D) -> Result<Combinator, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw.as_ref().and_then(|v| v.as_str()) {
        Some(OR_OPERATOR) => Combinator::Or,
        _ => Combinator::And,
    })
}

/// Unknown comparator tokens fall back to equality
fn deserialize_comparator<'de, D>(deserializer: D) -> Result<Option<Comparator>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw.as_ref().and_then(|v| v.as_str()) {
        Some(NOT_EQUAL_OPERATOR) => Some(Comparator::NotEqual),
        Some(REGEX_OPERATOR) => Some(Comparator::RegexMatch),
        _ => None,
    })
}

// ============================================================================
// Input: sort requests
// ============================================================================

/// One sort key. `value` (or `direction`) of exactly 1 means ascending.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SortRequest {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default, alias = "direction")]
    pub value: serde_json::Value,
}

impl SortRequest {
    pub fn new(field: &str, value: impl Into<serde_json::Value>) -> Self {
        Self {
            field: Some(field.to_string()),
            value: value.into(),
        }
    }

    /// Direction after normalization
    pub fn order(&self) -> SortOrder {
        if self.value.as_f64() == Some(1.0) {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

// ============================================================================
// Output: compiled predicate
// ============================================================================

/// Predicate fragment for a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPredicate {
    Eq(String),
    Ne(String),
    Regex(String),
}

impl FieldPredicate {
    pub fn new(comparator: Option<Comparator>, value: String) -> Self {
        match comparator {
            Some(Comparator::NotEqual) => Self::Ne(value),
            Some(Comparator::RegexMatch) => Self::Regex(value),
            None => Self::Eq(value),
        }
    }
}

impl Serialize for FieldPredicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Eq(value) => serializer.serialize_str(value),
            Self::Ne(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(NOT_EQUAL_OPERATOR, value)?;
                map.end()
            }
            Self::Regex(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(REGEX_OPERATOR, value)?;
                map.end()
            }
        }
    }
}

/// Flat field → fragment mapping (one item's conditions, or one OR branch)
pub type FieldSet = BTreeMap<String, FieldPredicate>;

/// Compiled filter: AND-merged fields plus ordered OR branches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledPredicate {
    fields: FieldSet,
    any_of: Vec<FieldSet>,
}

impl CompiledPredicate {
    /// Shallow-merge a field set into the top level (last write wins)
    pub fn merge_all(&mut self, set: FieldSet) {
        self.fields.extend(set);
    }

    /// Append a field set as an OR branch
    pub fn push_any(&mut self, set: FieldSet) {
        self.any_of.push(set);
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&FieldPredicate> {
        self.fields.get(field)
    }

    /// OR branches; empty when no item used the OR combinator
    pub fn any_of(&self) -> &[FieldSet] {
        &self.any_of
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.any_of.is_empty()
    }
}

impl Serialize for CompiledPredicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let or_entry = usize::from(!self.any_of.is_empty());
        let mut map = serializer.serialize_map(Some(self.fields.len() + or_entry))?;
        for (field, predicate) in &self.fields {
            map.serialize_entry(field, predicate)?;
        }
        if !self.any_of.is_empty() {
            map.serialize_entry(OR_OPERATOR, &self.any_of)?;
        }
        map.end()
    }
}

// ============================================================================
// Output: compiled sort
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }
}

impl Serialize for SortOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.as_i32())
    }
}

/// Ordered sort keys; earlier keys take priority
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledSort {
    keys: Vec<(String, SortOrder)>,
}

impl CompiledSort {
    /// Set a key's direction. A repeated key keeps its first position.
    pub fn set(&mut self, field: &str, order: SortOrder) {
        match self.keys.iter_mut().find(|(f, _)| f == field) {
            Some(entry) => entry.1 = order,
            None => self.keys.push((field.to_string(), order)),
        }
    }

    pub fn get(&self, field: &str) -> Option<SortOrder> {
        self.keys
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, order)| *order)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortOrder)> {
        self.keys.iter().map(|(f, o)| (f.as_str(), *o))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Serialize for CompiledSort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (field, order) in &self.keys {
            map.serialize_entry(field, order)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_item_accepts_legacy_comparator_key() {
        let json = r#"{"comparator": "$or", "condition": []}"#;
        let item: FilterItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.combinator, Combinator::Or);
    }

    #[test]
    fn filter_item_unknown_combinator_is_and() {
        let json = r#"{"combinator": "$nor", "condition": []}"#;
        let item: FilterItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.combinator, Combinator::And);

        let json = r#"{"combinator": 7, "condition": []}"#;
        let item: FilterItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.combinator, Combinator::And);
    }

    #[test]
    fn filter_item_requires_condition_list() {
        let json = r#"{"combinator": "$or"}"#;
        assert!(serde_json::from_str::<FilterItem>(json).is_err());
    }

    #[test]
    fn condition_comparators() {
        let json = r#"[
            {"field": "title", "comparator": "$ne", "value": "a"},
            {"field": "title", "comparator": "$regex", "value": "b"},
            {"field": "title", "comparator": "$gt", "value": "c"},
            {"field": "title", "value": "d"}
        ]"#;
        let conditions: Vec<FilterCondition> = serde_json::from_str(json).unwrap();
        let comparators: Vec<_> = conditions.iter().map(|c| c.comparator).collect();
        assert_eq!(
            comparators,
            vec![
                Some(Comparator::NotEqual),
                Some(Comparator::RegexMatch),
                None,
                None
            ]
        );
    }

    #[test]
    fn condition_value_nested() {
        let json = r#"{"field": "title", "value": [{"condition": [{"field": "remark", "value": "x"}]}]}"#;
        let condition: FilterCondition = serde_json::from_str(json).unwrap();
        match condition.value {
            Some(ConditionValue::Nested(items)) => assert_eq!(items.len(), 1),
            other => panic!("expected nested value, got {:?}", other),
        }
    }

    #[test]
    fn condition_value_rejects_objects() {
        let json = r#"{"field": "title", "value": {"$where": "1"}}"#;
        assert!(serde_json::from_str::<FilterCondition>(json).is_err());
    }

    #[test]
    fn sort_request_direction_alias() {
        let json = r#"{"field": "createDate", "direction": 1}"#;
        let sort: SortRequest = serde_json::from_str(json).unwrap();
        assert_eq!(sort.order(), SortOrder::Asc);
    }

    #[test]
    fn sort_request_non_one_is_desc() {
        for value in [
            serde_json::json!(0),
            serde_json::json!(-1),
            serde_json::json!(2),
            serde_json::json!("1"),
            serde_json::Value::Null,
        ] {
            assert_eq!(SortRequest::new("createDate", value).order(), SortOrder::Desc);
        }
        assert_eq!(SortRequest::new("createDate", 1.0).order(), SortOrder::Asc);
    }

    #[test]
    fn predicate_serializes_operator_fragments() {
        let mut predicate = CompiledPredicate::default();
        let mut set = FieldSet::new();
        set.insert("title".into(), FieldPredicate::Eq("foo".into()));
        set.insert("remark".into(), FieldPredicate::Ne("bar".into()));
        predicate.merge_all(set);

        let mut branch = FieldSet::new();
        branch.insert("questionType".into(), FieldPredicate::Regex("^n".into()));
        predicate.push_any(branch);

        assert_eq!(
            serde_json::to_string(&predicate).unwrap(),
            r#"{"remark":{"$ne":"bar"},"title":"foo","$or":[{"questionType":{"$regex":"^n"}}]}"#
        );
    }

    #[test]
    fn sort_keeps_first_position_on_overwrite() {
        let mut sort = CompiledSort::default();
        sort.set("updateDate", SortOrder::Asc);
        sort.set("createDate", SortOrder::Desc);
        sort.set("updateDate", SortOrder::Desc);

        assert_eq!(
            serde_json::to_string(&sort).unwrap(),
            r#"{"updateDate":-1,"createDate":-1}"#
        );
    }
}
