//! Domain logic for survey management
//!
//! - `query` - Filter and sort expression compiler for list endpoints
//! - `surveys` - Survey lifecycle, config history and response data

pub mod query;
pub mod surveys;

pub use query::QueryExpressionCompiler;
pub use surveys::{HistoryService, SurveyService};
