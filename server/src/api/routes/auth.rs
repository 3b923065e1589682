//! Authentication API endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::auth::AuthManager;
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::core::constants::{DEFAULT_SESSION_TTL_DAYS, DEFAULT_USER_ID, SESSION_COOKIE_NAME};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExchangeRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExchangeResponse {
    pub success: bool,
    /// Session JWT, usable as a Bearer token by non-browser clients
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthStatusResponse {
    fn anonymous() -> Self {
        Self {
            authenticated: false,
            version: env!("CARGO_PKG_VERSION"),
            auth_method: None,
            username: None,
            expires_at: None,
        }
    }
}

/// Create auth routes
pub fn routes(auth_manager: Arc<AuthManager>) -> Router {
    Router::new()
        .route("/exchange", post(exchange_token))
        .route("/status", get(auth_status))
        .route("/logout", post(logout))
        .with_state(auth_manager)
}

fn session_cookie(value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, value))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/api")
        .max_age(max_age)
        .build()
}

/// Exchange bootstrap token for a session
#[utoipa::path(
    post,
    path = "/api/auth/exchange",
    tag = "auth",
    request_body = ExchangeRequest,
    responses(
        (status = 200, description = "Token exchanged successfully", body = ExchangeResponse),
        (status = 401, description = "Invalid bootstrap token")
    )
)]
pub async fn exchange_token(
    State(auth): State<Arc<AuthManager>>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<ExchangeRequest>,
) -> Result<(CookieJar, Json<ExchangeResponse>), ApiError> {
    let jwt = auth.exchange_token(&request.token).map_err(|e| {
        tracing::debug!(error = %e, "Bootstrap exchange rejected");
        ApiError::unauthorized("BOOTSTRAP_INVALID", "Invalid bootstrap token")
    })?;

    let cookie = session_cookie(
        jwt.clone(),
        time::Duration::days(i64::from(DEFAULT_SESSION_TTL_DAYS)),
    );
    Ok((
        jar.add(cookie),
        Json(ExchangeResponse {
            success: true,
            token: jwt,
        }),
    ))
}

/// Report whether the session cookie is valid
#[utoipa::path(
    get,
    path = "/api/auth/status",
    tag = "auth",
    responses(
        (status = 200, description = "Authentication status", body = AuthStatusResponse)
    )
)]
pub async fn auth_status(
    State(auth): State<Arc<AuthManager>>,
    jar: CookieJar,
) -> Json<AuthStatusResponse> {
    if !auth.is_enabled() {
        return Json(AuthStatusResponse {
            authenticated: true,
            auth_method: Some("disabled".to_string()),
            username: Some(DEFAULT_USER_ID.to_string()),
            ..AuthStatusResponse::anonymous()
        });
    }

    let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
        return Json(AuthStatusResponse::anonymous());
    };

    match auth.validate_session(cookie.value()) {
        Ok(claims) => Json(AuthStatusResponse {
            authenticated: true,
            expires_at: DateTime::from_timestamp(claims.exp, 0),
            username: Some(claims.username().to_string()),
            auth_method: Some(claims.auth_method),
            ..AuthStatusResponse::anonymous()
        }),
        Err(_) => Json(AuthStatusResponse::anonymous()),
    }
}

/// Logout - clear session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out successfully")
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let cookie = session_cookie(String::new(), time::Duration::seconds(0));
    (
        jar.remove(cookie),
        Json(serde_json::json!({ "success": true })),
    )
}
