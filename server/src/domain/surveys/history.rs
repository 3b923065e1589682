//! Config snapshot history

use std::sync::Arc;

use serde_json::Value;

use super::error::SurveyError;
use super::types::UserData;
use crate::core::constants::HISTORY_LIST_LIMIT;
use crate::data::SurveyRepository;
use crate::data::types::{HistoryOperator, HistoryType, SurveyHistory};
use crate::utils::{crypto, time};

#[derive(Clone)]
pub struct HistoryService {
    repository: Arc<dyn SurveyRepository>,
    limit: usize,
}

impl HistoryService {
    pub fn new(repository: Arc<dyn SurveyRepository>) -> Self {
        Self {
            repository,
            limit: HISTORY_LIST_LIMIT,
        }
    }

    /// Record a snapshot of `schema` for the survey
    pub async fn add(
        &self,
        survey_id: &str,
        schema: Value,
        history_type: HistoryType,
        user: &UserData,
    ) -> Result<SurveyHistory, SurveyError> {
        let history = SurveyHistory {
            id: crypto::generate_id(),
            page_id: survey_id.to_string(),
            history_type,
            schema,
            operator: HistoryOperator {
                username: user.username.clone(),
            },
            create_date: time::now_millis(),
        };
        self.repository.insert_history(&history).await?;
        tracing::debug!(survey_id, ?history_type, "History recorded");
        Ok(history)
    }

    /// Latest snapshots of one kind, newest first
    pub async fn list(
        &self,
        survey_id: &str,
        history_type: HistoryType,
    ) -> Result<Vec<SurveyHistory>, SurveyError> {
        Ok(self
            .repository
            .list_history(survey_id, history_type, self.limit)
            .await?)
    }
}
