use thiserror::Error;

use crate::data::DataError;
use crate::domain::query::QueryError;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Survey not found: {0}")]
    NotFound(String),

    #[error("No permission for survey: {0}")]
    Forbidden(String),

    #[error("Config not found for survey: {0}")]
    ConfigMissing(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Data(#[from] DataError),
}
