//! In-memory survey repository
//!
//! Process-local storage behind `parking_lot::RwLock`. Evaluates compiled
//! list predicates against the serialized survey documents, so filtering
//! and sorting see the same field names clients use.

mod matcher;

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use self::matcher::{PredicateMatcher, compare_docs};
use crate::data::error::DataError;
use crate::data::traits::SurveyRepository;
use crate::data::types::{
    HistoryType, ListSurveysParams, SurveyConf, SurveyHistory, SurveyMeta, SurveySubmission,
};

#[derive(Default)]
struct MemoryState {
    surveys: HashMap<String, SurveyMeta>,
    confs: HashMap<String, SurveyConf>,
    published: HashMap<String, SurveyConf>,
    history: Vec<SurveyHistory>,
    submissions: Vec<SurveySubmission>,
}

/// In-memory `SurveyRepository`
#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
    banner: Value,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payload returned by `banner_data`
    pub fn with_banner_data(mut self, banner: Value) -> Self {
        self.banner = banner;
        self
    }
}

#[async_trait]
impl SurveyRepository for MemoryRepository {
    async fn insert_survey(&self, meta: &SurveyMeta) -> Result<(), DataError> {
        let mut state = self.state.write();
        if state.surveys.contains_key(&meta.id) {
            return Err(DataError::Conflict(format!("survey {} exists", meta.id)));
        }
        state.surveys.insert(meta.id.clone(), meta.clone());
        Ok(())
    }

    async fn get_survey(&self, survey_id: &str) -> Result<Option<SurveyMeta>, DataError> {
        Ok(self.state.read().surveys.get(survey_id).cloned())
    }

    async fn update_survey(&self, meta: &SurveyMeta) -> Result<(), DataError> {
        let mut state = self.state.write();
        match state.surveys.get_mut(&meta.id) {
            Some(existing) => {
                *existing = meta.clone();
                Ok(())
            }
            None => Err(DataError::not_found(format!("survey {}", meta.id))),
        }
    }

    async fn list_surveys(
        &self,
        params: &ListSurveysParams<'_>,
    ) -> Result<(Vec<SurveyMeta>, u64), DataError> {
        let matcher = PredicateMatcher::compile(params.predicate)?;

        let state = self.state.read();
        let mut matched: Vec<(Value, &SurveyMeta)> = Vec::new();
        for meta in state.surveys.values() {
            if meta.owner != params.owner || meta.is_removed() {
                continue;
            }
            let doc = serde_json::to_value(meta)?;
            if matcher.matches(&doc) {
                matched.push((doc, meta));
            }
        }

        matched.sort_by(|(a, _), (b, _)| compare_docs(a, b, params.sort));
        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(params.offset())
            .take(params.page_size as usize)
            .map(|(_, meta)| meta.clone())
            .collect();

        tracing::trace!(owner = params.owner, total, "Listed surveys");
        Ok((page, total))
    }

    async fn get_conf(&self, page_id: &str) -> Result<Option<SurveyConf>, DataError> {
        Ok(self.state.read().confs.get(page_id).cloned())
    }

    async fn save_conf(&self, conf: &SurveyConf) -> Result<(), DataError> {
        self.state
            .write()
            .confs
            .insert(conf.page_id.clone(), conf.clone());
        Ok(())
    }

    async fn save_published_conf(&self, conf: &SurveyConf) -> Result<(), DataError> {
        self.state
            .write()
            .published
            .insert(conf.page_id.clone(), conf.clone());
        Ok(())
    }

    async fn get_published_conf(&self, page_id: &str) -> Result<Option<SurveyConf>, DataError> {
        Ok(self.state.read().published.get(page_id).cloned())
    }

    async fn insert_history(&self, history: &SurveyHistory) -> Result<(), DataError> {
        self.state.write().history.push(history.clone());
        Ok(())
    }

    async fn list_history(
        &self,
        page_id: &str,
        history_type: HistoryType,
        limit: usize,
    ) -> Result<Vec<SurveyHistory>, DataError> {
        let state = self.state.read();
        // insertion order is chronological
        Ok(state
            .history
            .iter()
            .rev()
            .filter(|h| h.page_id == page_id && h.history_type == history_type)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_submission(&self, submission: &SurveySubmission) -> Result<(), DataError> {
        self.state.write().submissions.push(submission.clone());
        Ok(())
    }

    async fn list_submissions(
        &self,
        page_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<SurveySubmission>, u64), DataError> {
        let state = self.state.read();
        let mut matched: Vec<&SurveySubmission> = state
            .submissions
            .iter()
            .filter(|s| s.page_id == page_id)
            .collect();
        matched.sort_by(|a, b| b.create_date.cmp(&a.create_date));

        let total = matched.len() as u64;
        let offset = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
        let rows = matched
            .into_iter()
            .skip(offset)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok((rows, total))
    }

    async fn banner_data(&self) -> Result<Value, DataError> {
        Ok(self.banner.clone())
    }
}
