//! Survey list query compilation
//!
//! Compiles client-supplied filter trees and sort lists into allow-listed
//! predicates and sort specs for the persistence layer.
//!
//! ## Usage
//!
//! ```no_run
//! use surveyseat_server::domain::query::{QueryExpressionCompiler, QueryLimits, parse_filter_param};
//!
//! let raw = r#"[{"condition": [{"field": "title", "value": "foo"}]}]"#;
//! let items = parse_filter_param(raw, &QueryLimits::default()).unwrap();
//! let predicate = QueryExpressionCompiler::surveys().compile_filter(&items).unwrap();
//! ```

mod compiler;
mod error;
mod fields;
mod limits;
mod parser;
mod types;

pub use compiler::{DuplicateFieldPolicy, QueryExpressionCompiler};
pub use error::{ParamKind, QueryError};
pub use fields::{FieldAllowList, SURVEY_FILTER_FIELDS, SURVEY_SORT_FIELDS};
pub use limits::QueryLimits;
pub use parser::{parse_filter_param, parse_order_param};
pub use types::{
    Combinator, Comparator, CompiledPredicate, CompiledSort, ConditionValue, FieldPredicate,
    FieldSet, FilterCondition, FilterItem, SortOrder, SortRequest,
};
