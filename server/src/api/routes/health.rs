//! Health check endpoint

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::constants::APP_NAME_LOWER;
use crate::domain::query::QueryLimits;

/// Startup facts reported by the health endpoint
#[derive(Debug, Clone, Copy)]
pub struct HealthState {
    pub auth_enabled: bool,
    pub limits: QueryLimits,
}

/// List query bounds in effect
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryLimitsInfo {
    pub max_depth: usize,
    pub max_conditions: usize,
    pub max_param_bytes: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub auth_enabled: bool,
    pub query_limits: QueryLimitsInfo,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: APP_NAME_LOWER,
        version: env!("CARGO_PKG_VERSION"),
        auth_enabled: state.auth_enabled,
        query_limits: QueryLimitsInfo {
            max_depth: state.limits.effective_max_depth(),
            max_conditions: state.limits.max_conditions,
            max_param_bytes: state.limits.max_param_bytes,
        },
    })
}
