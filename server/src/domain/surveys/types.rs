use serde::Serialize;
use utoipa::ToSchema;

use crate::data::types::{SurveyConf, SurveyHistory, SurveyMeta};

/// Identity of the caller, as seen by survey operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub username: String,
}

impl UserData {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// How a new survey gets its initial config
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateMethod {
    /// Fresh config for `question_type`
    Basic { question_type: String },
    /// Copy config and question type of an owned survey
    Copy { from: String },
}

impl CreateMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::Copy { .. } => "copy",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewSurvey {
    pub title: String,
    pub remark: String,
    pub method: CreateMethod,
}

/// One page of the caller's surveys
#[derive(Debug, Serialize, ToSchema)]
pub struct SurveyListResult {
    pub count: u64,
    pub data: Vec<SurveyMeta>,
}

/// Survey meta with its (editable or published) config
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDetail {
    pub survey_meta_res: SurveyMeta,
    pub survey_conf_res: SurveyConf,
}

/// Result of a config save
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveConfResult {
    pub save_res: SurveyConf,
    pub history_res: SurveyHistory,
}

/// Result of a publish
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishResult {
    #[serde(flatten)]
    pub detail: SurveyDetail,
    pub history_res: SurveyHistory,
}

/// Column header for response listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DataListHead {
    pub field: String,
    pub title: String,
}

/// Paged respondent data
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDataResult {
    pub total: u64,
    pub list_head: Vec<DataListHead>,
    #[schema(value_type = Vec<Object>)]
    pub list_body: Vec<serde_json::Map<String, serde_json::Value>>,
}
