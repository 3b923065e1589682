//! Survey API types

use serde::Deserialize;
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::types::{default_page, default_page_size, validate_page, validate_page_size};
use crate::data::types::HistoryType;
use crate::domain::surveys::{CreateMethod, NewSurvey, SurveyError};

fn default_true() -> bool {
    true
}

/// Request body for `/add`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSurveyRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "Remark must be at most 1000 characters"))]
    pub remark: String,
    #[validate(length(min = 1, message = "questionType is required"))]
    pub question_type: String,
}

impl From<AddSurveyRequest> for NewSurvey {
    fn from(req: AddSurveyRequest) -> Self {
        Self {
            title: req.title,
            remark: req.remark,
            method: CreateMethod::Basic {
                question_type: req.question_type,
            },
        }
    }
}

/// Request body for `/create`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurveyRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "Remark must be at most 1000 characters"))]
    pub remark: String,
    /// `basic` (default) or `copy`
    pub create_method: Option<String>,
    pub question_type: Option<String>,
    /// Survey to copy when `createMethod` is `copy`
    pub create_from: Option<String>,
}

impl TryFrom<CreateSurveyRequest> for NewSurvey {
    type Error = SurveyError;

    fn try_from(req: CreateSurveyRequest) -> Result<Self, Self::Error> {
        let method = match req.create_method.as_deref().unwrap_or("basic") {
            "copy" => CreateMethod::Copy {
                from: req
                    .create_from
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| SurveyError::Invalid("createFrom is required".into()))?,
            },
            "basic" => CreateMethod::Basic {
                question_type: req
                    .question_type
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| SurveyError::Invalid("questionType is required".into()))?,
            },
            other => {
                return Err(SurveyError::Invalid(format!(
                    "Unknown createMethod: {}",
                    other
                )));
            }
        };
        Ok(Self {
            title: req.title,
            remark: req.remark,
            method,
        })
    }
}

/// Request body for `/update`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSurveyRequest {
    #[validate(length(min = 1, message = "surveyId is required"))]
    pub survey_id: String,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "Remark must be at most 1000 characters"))]
    pub remark: String,
}

/// Request body carrying only a survey id (`/delete`, `/publish`)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyIdRequest {
    #[validate(length(min = 1, message = "surveyId is required"))]
    pub survey_id: String,
}

/// Request body for `/saveConf`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveConfRequest {
    #[validate(length(min = 1, message = "surveyId is required"))]
    pub survey_id: String,
    #[schema(value_type = Object)]
    pub config_data: Map<String, Value>,
}

/// Query params for `/list`
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct ListSurveysQuery {
    #[serde(default = "default_page")]
    #[validate(custom(function = "validate_page"))]
    pub cur_page: u32,

    #[serde(default = "default_page_size")]
    #[validate(custom(function = "validate_page_size"))]
    pub page_size: u32,

    /// Percent-encoded JSON array of filter items
    pub filter: Option<String>,

    /// Percent-encoded JSON array of `{field, value}` sort entries
    pub order: Option<String>,
}

/// Query params carrying only a survey id (`/get`)
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct SurveyIdQuery {
    #[validate(length(min = 1, message = "surveyId is required"))]
    pub survey_id: String,
}

/// Query params for `/getHistoryList`
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct HistoryListQuery {
    #[validate(length(min = 1, message = "surveyId is required"))]
    pub survey_id: String,
    #[param(value_type = String)]
    pub history_type: HistoryType,
}

/// Query params for `/data`
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct SurveyDataQuery {
    #[validate(length(min = 1, message = "surveyId is required"))]
    pub survey_id: String,

    /// Mask answers of secret fields
    #[serde(default = "default_true")]
    pub is_show_secret: bool,

    #[serde(default = "default_page")]
    #[validate(custom(function = "validate_page"))]
    pub page: u32,

    #[serde(default = "default_page_size")]
    #[validate(custom(function = "validate_page_size"))]
    pub page_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(method: Option<&str>, question_type: Option<&str>, from: Option<&str>) -> CreateSurveyRequest {
        CreateSurveyRequest {
            title: "t".into(),
            remark: String::new(),
            create_method: method.map(String::from),
            question_type: question_type.map(String::from),
            create_from: from.map(String::from),
        }
    }

    #[test]
    fn test_create_defaults_to_basic() {
        let survey = NewSurvey::try_from(create(None, Some("normal"), None)).unwrap();
        assert_eq!(
            survey.method,
            CreateMethod::Basic {
                question_type: "normal".into()
            }
        );
    }

    #[test]
    fn test_create_copy_requires_source() {
        assert!(matches!(
            NewSurvey::try_from(create(Some("copy"), None, None)),
            Err(SurveyError::Invalid(_))
        ));
        let survey = NewSurvey::try_from(create(Some("copy"), None, Some("abc"))).unwrap();
        assert_eq!(survey.method, CreateMethod::Copy { from: "abc".into() });
    }

    #[test]
    fn test_create_basic_requires_question_type() {
        assert!(NewSurvey::try_from(create(Some("basic"), Some(""), None)).is_err());
        assert!(NewSurvey::try_from(create(Some("template"), Some("normal"), None)).is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListSurveysQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.cur_page, 1);
        assert_eq!(query.page_size, 10);
        assert!(query.filter.is_none());
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_data_query_shows_secret_by_default() {
        let query: SurveyDataQuery =
            serde_json::from_value(serde_json::json!({ "surveyId": "s1" })).unwrap();
        assert!(query.is_show_secret);
    }
}
