//! Repository traits for storage backends
//!
//! The survey handlers only talk to `SurveyRepository`; compiled list
//! predicates and sort specs are passed through unchanged and evaluated by
//! the backend.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{
    HistoryType, ListSurveysParams, SurveyConf, SurveyHistory, SurveyMeta, SurveySubmission,
};

/// Repository trait for survey management
#[async_trait]
pub trait SurveyRepository: Send + Sync {
    // ==================== Survey Meta ====================

    /// Insert a new survey; fails with `Conflict` if the id exists
    async fn insert_survey(&self, meta: &SurveyMeta) -> Result<(), DataError>;

    /// Get a survey by id (removed surveys included)
    async fn get_survey(&self, survey_id: &str) -> Result<Option<SurveyMeta>, DataError>;

    /// Replace an existing survey; fails with `NotFound` if absent
    async fn update_survey(&self, meta: &SurveyMeta) -> Result<(), DataError>;

    /// List non-removed surveys of one owner matching the predicate.
    ///
    /// Returns the requested page and the total match count. An empty sort
    /// spec sorts by `createDate` descending.
    async fn list_surveys(
        &self,
        params: &ListSurveysParams<'_>,
    ) -> Result<(Vec<SurveyMeta>, u64), DataError>;

    // ==================== Survey Config ====================

    async fn get_conf(&self, page_id: &str) -> Result<Option<SurveyConf>, DataError>;

    /// Insert or replace the editable config
    async fn save_conf(&self, conf: &SurveyConf) -> Result<(), DataError>;

    /// Insert or replace the published config
    async fn save_published_conf(&self, conf: &SurveyConf) -> Result<(), DataError>;

    async fn get_published_conf(&self, page_id: &str) -> Result<Option<SurveyConf>, DataError>;

    // ==================== History ====================

    async fn insert_history(&self, history: &SurveyHistory) -> Result<(), DataError>;

    /// Newest first, at most `limit` records
    async fn list_history(
        &self,
        page_id: &str,
        history_type: HistoryType,
        limit: usize,
    ) -> Result<Vec<SurveyHistory>, DataError>;

    // ==================== Submissions ====================

    async fn insert_submission(&self, submission: &SurveySubmission) -> Result<(), DataError>;

    /// Newest first, paged (1-based page)
    async fn list_submissions(
        &self,
        page_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<SurveySubmission>, u64), DataError>;

    // ==================== Misc ====================

    /// Static banner content for the management UI
    async fn banner_data(&self) -> Result<serde_json::Value, DataError>;
}
