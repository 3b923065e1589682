//! Filter/order expression compiler
//!
//! Turns client filter trees and sort lists into allow-listed predicates
//! and sort specs. Pure: no I/O, no state between calls.

use super::error::QueryError;
use super::fields::{FieldAllowList, SURVEY_FILTER_FIELDS, SURVEY_SORT_FIELDS};
use super::types::{
    Combinator, CompiledPredicate, CompiledSort, ConditionValue, FieldPredicate, FieldSet,
    FilterCondition, FilterItem, SortRequest,
};

/// How repeated fields within one item's conditions are resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateFieldPolicy {
    /// The later condition replaces the earlier one
    #[default]
    LastWriteWins,
    /// Fail with `QueryError::DuplicateField`
    Reject,
}

#[derive(Debug, Clone)]
pub struct QueryExpressionCompiler {
    filter_fields: FieldAllowList,
    sort_fields: FieldAllowList,
    duplicates: DuplicateFieldPolicy,
}

impl QueryExpressionCompiler {
    pub fn new(filter_fields: FieldAllowList, sort_fields: FieldAllowList) -> Self {
        Self {
            filter_fields,
            sort_fields,
            duplicates: DuplicateFieldPolicy::default(),
        }
    }

    /// Compiler over the survey list allow-lists
    pub fn surveys() -> Self {
        Self::new(SURVEY_FILTER_FIELDS, SURVEY_SORT_FIELDS)
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicateFieldPolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn filter_fields(&self) -> FieldAllowList {
        self.filter_fields
    }

    pub fn sort_fields(&self) -> FieldAllowList {
        self.sort_fields
    }

    /// Fold filter items left to right into one predicate.
    ///
    /// AND items are shallow-merged into the top level (later keys overwrite
    /// earlier ones); OR items are appended as branches. Conditions on fields
    /// outside the allow-list are dropped. Only fails under
    /// `DuplicateFieldPolicy::Reject`.
    pub fn compile_filter(&self, items: &[FilterItem]) -> Result<CompiledPredicate, QueryError> {
        let mut predicate = CompiledPredicate::default();
        for item in items {
            let set = self.compile_conditions(&item.condition)?;
            match item.combinator {
                Combinator::Or => predicate.push_any(set),
                Combinator::And => predicate.merge_all(set),
            }
        }
        Ok(predicate)
    }

    /// Keep allow-listed sort keys; direction 1 is ascending, anything else descending
    pub fn compile_order(&self, items: &[SortRequest]) -> CompiledSort {
        let mut sort = CompiledSort::default();
        for item in items {
            match item.field.as_deref() {
                Some(field) if self.sort_fields.contains(field) => sort.set(field, item.order()),
                other => tracing::trace!(field = ?other, "Dropping non-sortable field"),
            }
        }
        sort
    }

    fn compile_conditions(&self, conditions: &[FilterCondition]) -> Result<FieldSet, QueryError> {
        let mut set = FieldSet::new();
        for condition in conditions {
            let Some(field) = condition.field.as_deref() else {
                continue;
            };
            if !self.filter_fields.contains(field) {
                tracing::trace!(field, "Dropping non-filterable field");
                continue;
            }
            // Nested trees never reach the persistence layer for scalar fields
            let value = match &condition.value {
                Some(ConditionValue::Text(value)) => value.clone(),
                Some(ConditionValue::Nested(_)) | None => {
                    tracing::trace!(field, "Dropping condition without scalar value");
                    continue;
                }
            };
            let predicate = FieldPredicate::new(condition.comparator, value);
            if set.insert(field.to_string(), predicate).is_some()
                && self.duplicates == DuplicateFieldPolicy::Reject
            {
                return Err(QueryError::DuplicateField(field.to_string()));
            }
        }
        Ok(set)
    }
}

impl Default for QueryExpressionCompiler {
    fn default() -> Self {
        Self::surveys()
    }
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
