//! Survey management API endpoints
//!
//! Mounted under `/api/surveyManage`. `getBannerData` and `getHistoryList`
//! are public; everything else runs behind `require_auth` and acts as the
//! authenticated user.

pub mod types;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use crate::api::auth::{AuthState, CurrentUser, require_auth};
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, ApiResponse, IdResponse};
use crate::data::types::SurveyHistory;
use crate::domain::surveys::{
    ListRequest, NewSurvey, PublishResult, SaveConfResult, SurveyDataResult, SurveyDetail,
    SurveyListResult, SurveyService,
};

use types::{
    AddSurveyRequest, CreateSurveyRequest, HistoryListQuery, ListSurveysQuery, SaveConfRequest,
    SurveyDataQuery, SurveyIdQuery, SurveyIdRequest, UpdateSurveyRequest,
};

/// Shared state for survey endpoints
#[derive(Clone)]
pub struct SurveysApiState {
    pub surveys: SurveyService,
}

/// Build survey routes; protected routes get the auth layer here
pub fn routes(surveys: SurveyService, auth: AuthState) -> Router<()> {
    let state = SurveysApiState { surveys };

    let public = Router::new()
        .route("/getBannerData", get(get_banner_data))
        .route("/getHistoryList", get(get_history_list));

    let protected = Router::new()
        .route("/add", post(add_survey))
        .route("/create", post(create_survey))
        .route("/update", post(update_survey))
        .route("/delete", post(delete_survey))
        .route("/list", get(list_surveys))
        .route("/saveConf", post(save_conf))
        .route("/get", get(get_survey))
        .route("/publish", post(publish_survey))
        .route("/data", get(survey_data))
        .layer(axum::middleware::from_fn_with_state(auth, require_auth));

    public.merge(protected).with_state(state)
}

/// Banner content shown above the survey list
#[utoipa::path(
    get,
    path = "/api/surveyManage/getBannerData",
    tag = "surveys",
    responses(
        (status = 200, description = "Banner data in the `{code, data}` envelope")
    )
)]
pub async fn get_banner_data(
    State(state): State<SurveysApiState>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    Ok(ApiResponse::ok(state.surveys.banner_data().await?))
}

/// Create a survey from scratch
#[utoipa::path(
    post,
    path = "/api/surveyManage/add",
    tag = "surveys",
    request_body = AddSurveyRequest,
    responses(
        (status = 200, description = "Survey created", body = IdResponse),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn add_survey(
    State(state): State<SurveysApiState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(body): ValidatedJson<AddSurveyRequest>,
) -> Result<Json<ApiResponse<IdResponse>>, ApiError> {
    let meta = state.surveys.create(body.into(), &user).await?;
    Ok(ApiResponse::ok(IdResponse { id: meta.id }))
}

/// Create a survey, either basic or as a copy of an owned survey
#[utoipa::path(
    post,
    path = "/api/surveyManage/create",
    tag = "surveys",
    request_body = CreateSurveyRequest,
    responses(
        (status = 200, description = "Survey created", body = IdResponse),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Copy source is owned by another user")
    )
)]
pub async fn create_survey(
    State(state): State<SurveysApiState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(body): ValidatedJson<CreateSurveyRequest>,
) -> Result<Json<ApiResponse<IdResponse>>, ApiError> {
    let input = NewSurvey::try_from(body)?;
    let meta = state.surveys.create(input, &user).await?;
    Ok(ApiResponse::ok(IdResponse { id: meta.id }))
}

/// Update title and remark
#[utoipa::path(
    post,
    path = "/api/surveyManage/update",
    tag = "surveys",
    request_body = UpdateSurveyRequest,
    responses(
        (status = 200, description = "Survey updated"),
        (status = 403, description = "Survey owned by another user"),
        (status = 404, description = "Survey not found")
    )
)]
pub async fn update_survey(
    State(state): State<SurveysApiState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(body): ValidatedJson<UpdateSurveyRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .surveys
        .update(&body.survey_id, body.title, body.remark, &user)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// Mark a survey as removed
#[utoipa::path(
    post,
    path = "/api/surveyManage/delete",
    tag = "surveys",
    request_body = SurveyIdRequest,
    responses(
        (status = 200, description = "Survey removed"),
        (status = 403, description = "Survey owned by another user"),
        (status = 404, description = "Survey not found")
    )
)]
pub async fn delete_survey(
    State(state): State<SurveysApiState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(body): ValidatedJson<SurveyIdRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.surveys.delete(&body.survey_id, &user).await?;
    Ok(ApiResponse::ok(()))
}

/// List the caller's surveys with optional filter and order expressions
#[utoipa::path(
    get,
    path = "/api/surveyManage/list",
    tag = "surveys",
    params(ListSurveysQuery),
    responses(
        (status = 200, description = "One page of surveys", body = SurveyListResult),
        (status = 400, description = "Malformed filter or order parameter")
    )
)]
pub async fn list_surveys(
    State(state): State<SurveysApiState>,
    CurrentUser(user): CurrentUser,
    ValidatedQuery(query): ValidatedQuery<ListSurveysQuery>,
) -> Result<Json<ApiResponse<SurveyListResult>>, ApiError> {
    let request = ListRequest {
        page: query.cur_page,
        page_size: query.page_size,
        filter: query.filter.as_deref(),
        order: query.order.as_deref(),
    };
    Ok(ApiResponse::ok(state.surveys.list(request, &user).await?))
}

/// Save the editable survey config
#[utoipa::path(
    post,
    path = "/api/surveyManage/saveConf",
    tag = "surveys",
    request_body = SaveConfRequest,
    responses(
        (status = 200, description = "Config saved", body = SaveConfResult),
        (status = 403, description = "Survey owned by another user"),
        (status = 404, description = "Survey not found")
    )
)]
pub async fn save_conf(
    State(state): State<SurveysApiState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(body): ValidatedJson<SaveConfRequest>,
) -> Result<Json<ApiResponse<SaveConfResult>>, ApiError> {
    let result = state
        .surveys
        .save_conf(&body.survey_id, body.config_data, &user)
        .await?;
    Ok(ApiResponse::ok(result))
}

/// Survey meta with its editable config
#[utoipa::path(
    get,
    path = "/api/surveyManage/get",
    tag = "surveys",
    params(SurveyIdQuery),
    responses(
        (status = 200, description = "Survey detail", body = SurveyDetail),
        (status = 403, description = "Survey owned by another user"),
        (status = 404, description = "Survey not found")
    )
)]
pub async fn get_survey(
    State(state): State<SurveysApiState>,
    CurrentUser(user): CurrentUser,
    ValidatedQuery(query): ValidatedQuery<SurveyIdQuery>,
) -> Result<Json<ApiResponse<SurveyDetail>>, ApiError> {
    Ok(ApiResponse::ok(
        state.surveys.get(&query.survey_id, &user).await?,
    ))
}

/// Latest history snapshots of one type
#[utoipa::path(
    get,
    path = "/api/surveyManage/getHistoryList",
    tag = "surveys",
    params(HistoryListQuery),
    responses(
        (status = 200, description = "History records, newest first", body = Vec<SurveyHistory>)
    )
)]
pub async fn get_history_list(
    State(state): State<SurveysApiState>,
    ValidatedQuery(query): ValidatedQuery<HistoryListQuery>,
) -> Result<Json<ApiResponse<Vec<SurveyHistory>>>, ApiError> {
    let history = state
        .surveys
        .history()
        .list(&query.survey_id, query.history_type)
        .await?;
    Ok(ApiResponse::ok(history))
}

/// Publish the editable config
#[utoipa::path(
    post,
    path = "/api/surveyManage/publish",
    tag = "surveys",
    request_body = SurveyIdRequest,
    responses(
        (status = 200, description = "Survey published", body = PublishResult),
        (status = 403, description = "Survey owned by another user"),
        (status = 404, description = "Survey not found")
    )
)]
pub async fn publish_survey(
    State(state): State<SurveysApiState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(body): ValidatedJson<SurveyIdRequest>,
) -> Result<Json<ApiResponse<PublishResult>>, ApiError> {
    Ok(ApiResponse::ok(
        state.surveys.publish(&body.survey_id, &user).await?,
    ))
}

/// Paged respondent data
#[utoipa::path(
    get,
    path = "/api/surveyManage/data",
    tag = "surveys",
    params(SurveyDataQuery),
    responses(
        (status = 200, description = "Respondent data", body = SurveyDataResult),
        (status = 403, description = "Survey owned by another user"),
        (status = 404, description = "Survey not found")
    )
)]
pub async fn survey_data(
    State(state): State<SurveysApiState>,
    CurrentUser(user): CurrentUser,
    ValidatedQuery(query): ValidatedQuery<SurveyDataQuery>,
) -> Result<Json<ApiResponse<SurveyDataResult>>, ApiError> {
    let result = state
        .surveys
        .data(
            &query.survey_id,
            query.is_show_secret,
            query.page,
            query.page_size,
            &user,
        )
        .await?;
    Ok(ApiResponse::ok(result))
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
