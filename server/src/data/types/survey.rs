//! Survey document types
//!
//! Serialized field names are the ones clients filter and sort on
//! (`title`, `curStatus.status`, `createDate`, ...). Dates are epoch
//! milliseconds.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::domain::query::{CompiledPredicate, CompiledSort};

// ============================================================================
// Status
// ============================================================================

/// Lifecycle status of a survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SurveyStatus {
    New,
    Editing,
    Published,
    Removed,
}

impl SurveyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Editing => "editing",
            Self::Published => "published",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status transition record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusRecord {
    pub status: SurveyStatus,
    pub date: i64,
}

// ============================================================================
// Survey meta
// ============================================================================

/// Survey metadata document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyMeta {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub remark: String,
    pub question_type: String,
    pub survey_path: String,
    pub creator: String,
    pub owner: String,
    pub create_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_from: Option<String>,
    pub cur_status: StatusRecord,
    pub status_list: Vec<StatusRecord>,
    pub create_date: i64,
    pub update_date: i64,
}

impl SurveyMeta {
    /// Record a status transition at `now`
    pub fn set_status(&mut self, status: SurveyStatus, now: i64) {
        let record = StatusRecord { status, date: now };
        self.cur_status = record;
        self.status_list.push(record);
        self.update_date = now;
    }

    pub fn is_removed(&self) -> bool {
        self.cur_status.status == SurveyStatus::Removed
    }
}

/// Survey configuration (the editable schema)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyConf {
    pub page_id: String,
    #[schema(value_type = Object)]
    pub code: serde_json::Value,
    pub create_date: i64,
    pub update_date: i64,
}

// ============================================================================
// History
// ============================================================================

/// Kind of history snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum HistoryType {
    /// Snapshot taken on every config save
    DailyHis,
    /// Snapshot taken on publish
    PublishHis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryOperator {
    pub username: String,
}

/// Config snapshot record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyHistory {
    #[serde(rename = "_id")]
    pub id: String,
    pub page_id: String,
    #[serde(rename = "type")]
    pub history_type: HistoryType,
    #[schema(value_type = Object)]
    pub schema: serde_json::Value,
    pub operator: HistoryOperator,
    pub create_date: i64,
}

// ============================================================================
// Responses
// ============================================================================

/// One respondent submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveySubmission {
    #[serde(rename = "_id")]
    pub id: String,
    pub page_id: String,
    #[schema(value_type = Object)]
    pub data: serde_json::Map<String, serde_json::Value>,
    pub create_date: i64,
}

// ============================================================================
// Query params
// ============================================================================

/// Parameters for listing surveys owned by one user
#[derive(Debug, Clone, Copy)]
pub struct ListSurveysParams<'a> {
    pub owner: &'a str,
    pub predicate: &'a CompiledPredicate,
    pub sort: &'a CompiledSort,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl ListSurveysParams<'_> {
    /// Number of records to skip for the requested page
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.page_size as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> SurveyMeta {
        let created = StatusRecord {
            status: SurveyStatus::New,
            date: 1_000,
        };
        SurveyMeta {
            id: "s1".to_string(),
            title: "Customer feedback".to_string(),
            remark: "q3".to_string(),
            question_type: "normal".to_string(),
            survey_path: "abcd1234".to_string(),
            creator: "alice".to_string(),
            owner: "alice".to_string(),
            create_method: "basic".to_string(),
            create_from: None,
            cur_status: created,
            status_list: vec![created],
            create_date: 1_000,
            update_date: 1_000,
        }
    }

    #[test]
    fn test_meta_serializes_filterable_names() {
        let value = serde_json::to_value(meta()).unwrap();
        assert_eq!(value["_id"], "s1");
        assert_eq!(value["questionType"], "normal");
        assert_eq!(value["curStatus"]["status"], "new");
        assert_eq!(value["createDate"], 1_000);
        assert!(value.get("createFrom").is_none());
    }

    #[test]
    fn test_set_status() {
        let mut m = meta();
        m.set_status(SurveyStatus::Removed, 2_000);
        assert!(m.is_removed());
        assert_eq!(m.cur_status.date, 2_000);
        assert_eq!(m.status_list.len(), 2);
        assert_eq!(m.update_date, 2_000);
    }

    #[test]
    fn test_history_type_names() {
        assert_eq!(
            serde_json::to_value(HistoryType::DailyHis).unwrap(),
            "dailyHis"
        );
        let parsed: HistoryType = serde_json::from_str(r#""publishHis""#).unwrap();
        assert_eq!(parsed, HistoryType::PublishHis);
        assert!(serde_json::from_str::<HistoryType>(r#""other""#).is_err());
    }

    #[test]
    fn test_offset() {
        let predicate = CompiledPredicate::default();
        let sort = CompiledSort::default();
        let params = ListSurveysParams {
            owner: "alice",
            predicate: &predicate,
            sort: &sort,
            page: 3,
            page_size: 10,
        };
        assert_eq!(params.offset(), 20);
        let first = ListSurveysParams { page: 0, ..params };
        assert_eq!(first.offset(), 0);
    }
}
