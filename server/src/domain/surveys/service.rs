//! Survey lifecycle operations
//!
//! Every operation on an existing survey goes through `owned_survey`:
//! removed surveys are not found, and surveys of other users are forbidden.

use std::sync::Arc;

use serde_json::{Map, Value, json};

use super::error::SurveyError;
use super::history::HistoryService;
use super::secret::DataColumns;
use super::types::{
    CreateMethod, NewSurvey, PublishResult, SaveConfResult, SurveyDataResult, SurveyDetail,
    SurveyListResult, UserData,
};
use crate::core::constants::SURVEY_PATH_LEN;
use crate::data::SurveyRepository;
use crate::data::types::{
    HistoryType, ListSurveysParams, StatusRecord, SurveyConf, SurveyMeta, SurveyStatus,
};
use crate::domain::query::{
    QueryExpressionCompiler, QueryLimits, parse_filter_param, parse_order_param,
};
use crate::utils::{crypto, time};

/// One list request as received from the client
#[derive(Debug, Clone, Copy)]
pub struct ListRequest<'a> {
    pub page: u32,
    pub page_size: u32,
    /// Percent-encoded JSON filter tree
    pub filter: Option<&'a str>,
    /// Percent-encoded JSON sort list
    pub order: Option<&'a str>,
}

#[derive(Clone)]
pub struct SurveyService {
    repository: Arc<dyn SurveyRepository>,
    history: HistoryService,
    compiler: QueryExpressionCompiler,
    limits: QueryLimits,
}

impl SurveyService {
    pub fn new(
        repository: Arc<dyn SurveyRepository>,
        compiler: QueryExpressionCompiler,
        limits: QueryLimits,
    ) -> Self {
        Self {
            history: HistoryService::new(repository.clone()),
            repository,
            compiler,
            limits,
        }
    }

    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    /// Limits applied to list filter and order parameters
    pub fn limits(&self) -> QueryLimits {
        self.limits
    }

    pub async fn banner_data(&self) -> Result<Value, SurveyError> {
        Ok(self.repository.banner_data().await?)
    }

    /// Create a survey with its initial config
    pub async fn create(
        &self,
        input: NewSurvey,
        user: &UserData,
    ) -> Result<SurveyMeta, SurveyError> {
        let (question_type, code, create_from) = match &input.method {
            CreateMethod::Basic { question_type } => (
                question_type.clone(),
                initial_code(&input.title, question_type),
                None,
            ),
            CreateMethod::Copy { from } => {
                let source = self.owned_survey(from, user).await?;
                let conf = self
                    .repository
                    .get_conf(&source.id)
                    .await?
                    .ok_or_else(|| SurveyError::ConfigMissing(source.id.clone()))?;
                (source.question_type, conf.code, Some(source.id))
            }
        };

        let now = time::now_millis();
        let status = StatusRecord {
            status: SurveyStatus::New,
            date: now,
        };
        let meta = SurveyMeta {
            id: crypto::generate_id(),
            title: input.title,
            remark: input.remark,
            question_type,
            survey_path: crypto::generate_short_code(SURVEY_PATH_LEN),
            creator: user.username.clone(),
            owner: user.username.clone(),
            create_method: input.method.as_str().to_string(),
            create_from,
            cur_status: status,
            status_list: vec![status],
            create_date: now,
            update_date: now,
        };
        self.repository.insert_survey(&meta).await?;
        self.repository
            .save_conf(&SurveyConf {
                page_id: meta.id.clone(),
                code,
                create_date: now,
                update_date: now,
            })
            .await?;

        tracing::debug!(
            survey_id = %meta.id,
            method = meta.create_method,
            owner = %meta.owner,
            "Survey created"
        );
        Ok(meta)
    }

    /// Change title and remark
    pub async fn update(
        &self,
        survey_id: &str,
        title: String,
        remark: String,
        user: &UserData,
    ) -> Result<SurveyMeta, SurveyError> {
        let mut meta = self.owned_survey(survey_id, user).await?;
        meta.title = title;
        meta.remark = remark;
        meta.update_date = time::now_millis();
        self.repository.update_survey(&meta).await?;
        Ok(meta)
    }

    /// Soft delete: the survey keeps its data but is marked removed
    pub async fn delete(&self, survey_id: &str, user: &UserData) -> Result<SurveyMeta, SurveyError> {
        let mut meta = self.owned_survey(survey_id, user).await?;
        meta.set_status(SurveyStatus::Removed, time::now_millis());
        self.repository.update_survey(&meta).await?;
        tracing::debug!(survey_id, "Survey removed");
        Ok(meta)
    }

    /// Parse, compile and run a list query scoped to the caller
    pub async fn list(
        &self,
        request: ListRequest<'_>,
        user: &UserData,
    ) -> Result<SurveyListResult, SurveyError> {
        let filter = match request.filter.filter(|raw| !raw.is_empty()) {
            Some(raw) => parse_filter_param(raw, &self.limits)?,
            None => Vec::new(),
        };
        let order = match request.order.filter(|raw| !raw.is_empty()) {
            Some(raw) => parse_order_param(raw, &self.limits)?,
            None => Vec::new(),
        };

        let predicate = self.compiler.compile_filter(&filter)?;
        let sort = self.compiler.compile_order(&order);
        tracing::trace!(
            predicate = %serde_json::to_string(&predicate).unwrap_or_default(),
            sort = %serde_json::to_string(&sort).unwrap_or_default(),
            "Compiled list query"
        );

        let params = ListSurveysParams {
            owner: &user.username,
            predicate: &predicate,
            sort: &sort,
            page: request.page,
            page_size: request.page_size,
        };
        let (data, count) = self.repository.list_surveys(&params).await?;
        Ok(SurveyListResult { count, data })
    }

    /// Replace the editable config and record a daily snapshot
    pub async fn save_conf(
        &self,
        survey_id: &str,
        config: Map<String, Value>,
        user: &UserData,
    ) -> Result<SaveConfResult, SurveyError> {
        let mut meta = self.owned_survey(survey_id, user).await?;
        let now = time::now_millis();
        let create_date = self
            .repository
            .get_conf(survey_id)
            .await?
            .map_or(now, |c| c.create_date);

        let conf = SurveyConf {
            page_id: survey_id.to_string(),
            code: Value::Object(config),
            create_date,
            update_date: now,
        };
        self.repository.save_conf(&conf).await?;

        // a published survey with unpublished changes is back to editing
        if meta.cur_status.status != SurveyStatus::Editing {
            meta.set_status(SurveyStatus::Editing, now);
        } else {
            meta.update_date = now;
        }
        self.repository.update_survey(&meta).await?;

        let history = self
            .history
            .add(survey_id, conf.code.clone(), HistoryType::DailyHis, user)
            .await?;
        Ok(SaveConfResult {
            save_res: conf,
            history_res: history,
        })
    }

    pub async fn get(&self, survey_id: &str, user: &UserData) -> Result<SurveyDetail, SurveyError> {
        let meta = self.owned_survey(survey_id, user).await?;
        let conf = self
            .repository
            .get_conf(survey_id)
            .await?
            .ok_or_else(|| SurveyError::ConfigMissing(survey_id.to_string()))?;
        Ok(SurveyDetail {
            survey_meta_res: meta,
            survey_conf_res: conf,
        })
    }

    /// Copy the editable config to the published slot and record a snapshot
    pub async fn publish(
        &self,
        survey_id: &str,
        user: &UserData,
    ) -> Result<PublishResult, SurveyError> {
        let mut meta = self.owned_survey(survey_id, user).await?;
        let mut conf = self
            .repository
            .get_conf(survey_id)
            .await?
            .ok_or_else(|| SurveyError::ConfigMissing(survey_id.to_string()))?;

        let now = time::now_millis();
        conf.update_date = now;
        self.repository.save_published_conf(&conf).await?;
        meta.set_status(SurveyStatus::Published, now);
        self.repository.update_survey(&meta).await?;

        let history = self
            .history
            .add(survey_id, conf.code.clone(), HistoryType::PublishHis, user)
            .await?;
        tracing::debug!(survey_id, "Survey published");

        Ok(PublishResult {
            detail: SurveyDetail {
                survey_meta_res: meta,
                survey_conf_res: conf,
            },
            history_res: history,
        })
    }

    /// Paged respondent data; secret fields are masked when `mask_secrets`
    pub async fn data(
        &self,
        survey_id: &str,
        mask_secrets: bool,
        page: u32,
        page_size: u32,
        user: &UserData,
    ) -> Result<SurveyDataResult, SurveyError> {
        self.owned_survey(survey_id, user).await?;
        let conf = self
            .repository
            .get_published_conf(survey_id)
            .await?
            .or(self.repository.get_conf(survey_id).await?);
        let columns = conf
            .as_ref()
            .map(|c| DataColumns::from_code(&c.code))
            .unwrap_or_default();

        let (rows, total) = self
            .repository
            .list_submissions(survey_id, page, page_size)
            .await?;
        let list_body = rows
            .into_iter()
            .map(|submission| {
                let mut row = submission.data;
                if mask_secrets {
                    columns.mask_row(&mut row);
                }
                row.insert(
                    "createDate".to_string(),
                    Value::String(time::millis_to_iso(submission.create_date)),
                );
                row
            })
            .collect();

        Ok(SurveyDataResult {
            total,
            list_head: columns.heads,
            list_body,
        })
    }

    async fn owned_survey(
        &self,
        survey_id: &str,
        user: &UserData,
    ) -> Result<SurveyMeta, SurveyError> {
        let meta = self
            .repository
            .get_survey(survey_id)
            .await?
            .filter(|m| !m.is_removed())
            .ok_or_else(|| SurveyError::NotFound(survey_id.to_string()))?;
        if meta.owner != user.username {
            tracing::debug!(survey_id, user = %user.username, "Survey access denied");
            return Err(SurveyError::Forbidden(survey_id.to_string()));
        }
        Ok(meta)
    }
}

/// Starting config for a fresh survey
fn initial_code(title: &str, question_type: &str) -> Value {
    json!({
        "bannerConf": { "titleConfig": { "mainTitle": title } },
        "baseConf": {},
        "bottomConf": {},
        "skinConf": {},
        "submitConf": {},
        "dataConf": { "dataList": [] },
        "questionType": question_type,
    })
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
