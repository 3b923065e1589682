//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{auth, health, surveys};
use crate::api::types::IdResponse;
use crate::data::types::{
    HistoryOperator, HistoryType, StatusRecord, SurveyConf, SurveyHistory, SurveyMeta,
    SurveyStatus,
};
use crate::domain::surveys::{
    DataListHead, PublishResult, SaveConfResult, SurveyDataResult, SurveyDetail,
    SurveyListResult,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SurveySeat API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Survey management server"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "surveys", description = "Survey management")
    ),
    paths(
        // Health
        health::health,
        // Auth
        auth::exchange_token,
        auth::auth_status,
        auth::logout,
        // Surveys
        surveys::get_banner_data,
        surveys::add_survey,
        surveys::create_survey,
        surveys::update_survey,
        surveys::delete_survey,
        surveys::list_surveys,
        surveys::save_conf,
        surveys::get_survey,
        surveys::get_history_list,
        surveys::publish_survey,
        surveys::survey_data,
    ),
    components(schemas(
        IdResponse,
        // Health
        health::HealthResponse,
        health::QueryLimitsInfo,
        // Auth
        auth::ExchangeRequest,
        auth::ExchangeResponse,
        auth::AuthStatusResponse,
        // Survey requests
        surveys::types::AddSurveyRequest,
        surveys::types::CreateSurveyRequest,
        surveys::types::UpdateSurveyRequest,
        surveys::types::SurveyIdRequest,
        surveys::types::SaveConfRequest,
        // Survey records
        SurveyStatus,
        StatusRecord,
        SurveyMeta,
        SurveyConf,
        HistoryType,
        HistoryOperator,
        SurveyHistory,
        // Survey results
        SurveyListResult,
        SurveyDetail,
        SaveConfResult,
        PublishResult,
        DataListHead,
        SurveyDataResult,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>SurveySeat API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;
