//! Shared API types
//!
//! Common types used across all API endpoints including error handling,
//! the success envelope, and pagination.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationError;

use crate::core::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::data::DataError;
use crate::domain::query::{ParamKind, QueryError};
use crate::domain::surveys::SurveyError;

/// Validator function for page parameter
pub fn validate_page(page: u32) -> Result<(), ValidationError> {
    if page < 1 {
        return Err(ValidationError::new("page_min").with_message("Page must be >= 1".into()));
    }
    Ok(())
}

/// Validator function for page size parameter
pub fn validate_page_size(page_size: u32) -> Result<(), ValidationError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::new("page_size_range").with_message(
            format!("Page size must be between 1 and {}", MAX_PAGE_SIZE).into(),
        ));
    }
    Ok(())
}

pub fn default_page() -> u32 {
    DEFAULT_PAGE
}

pub fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Success envelope: `{"code": 200, "data": ...}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            code: StatusCode::OK.as_u16(),
            data,
        })
    }
}

/// Created survey reference
#[derive(Debug, Serialize, ToSchema)]
pub struct IdResponse {
    pub id: String,
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Unauthorized { code: String, message: String },
    Forbidden { code: String, message: String },
    Conflict { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Forbidden {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_data(e: DataError) -> Self {
        match e {
            DataError::NotFound(what) => Self::not_found("NOT_FOUND", format!("{} not found", what)),
            DataError::Conflict(what) => Self::conflict("CONFLICT", what),
            DataError::InvalidQuery(reason) => Self::bad_request("INVALID_QUERY", reason),
            e => {
                tracing::error!(error = %e, "Data error");
                Self::internal("Database operation failed")
            }
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        tracing::debug!(error = %e, "Rejected list query");
        let code = match &e {
            QueryError::InvalidFormat {
                kind: ParamKind::Filter,
                ..
            } => "INVALID_FILTER",
            QueryError::InvalidFormat {
                kind: ParamKind::Order,
                ..
            } => "INVALID_ORDER",
            QueryError::LimitExceeded { .. } => "FILTER_LIMIT_EXCEEDED",
            QueryError::DuplicateField(_) => "DUPLICATE_FILTER_FIELD",
        };
        Self::bad_request(code, e.to_string())
    }
}

impl From<SurveyError> for ApiError {
    fn from(e: SurveyError) -> Self {
        match e {
            SurveyError::NotFound(id) => {
                Self::not_found("SURVEY_NOT_FOUND", format!("Survey not found: {}", id))
            }
            SurveyError::Forbidden(_) => {
                Self::forbidden("NO_SURVEY_PERMISSION", "No permission for this survey")
            }
            SurveyError::ConfigMissing(id) => Self::not_found(
                "SURVEY_CONF_NOT_FOUND",
                format!("Config not found for survey: {}", id),
            ),
            SurveyError::Invalid(message) => Self::bad_request("INVALID_REQUEST", message),
            SurveyError::Query(e) => e.into(),
            SurveyError::Data(e) => Self::from_data(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", code, message)
            }
            Self::Forbidden { code, message } => {
                (StatusCode::FORBIDDEN, "forbidden", code, message)
            }
            Self::Conflict { code, message } => (StatusCode::CONFLICT, "conflict", code, message),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}
