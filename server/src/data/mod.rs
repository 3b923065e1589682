//! Data storage layer
//!
//! - `traits` - `SurveyRepository`, the persistence boundary for survey handlers
//! - `memory` - In-memory repository that evaluates compiled list predicates
//! - `types` - Survey document types shared by all backends
//! - `error` - Unified error type for all backends

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use memory::MemoryRepository;
pub use traits::SurveyRepository;
