//! Authentication middleware

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use serde_json::json;

use super::context::AuthContext;
use super::jwt::JwtError;
use super::manager::AuthManager;
use crate::api::middleware::AllowedOrigins;
use crate::core::constants::{DEFAULT_USER_ID, SESSION_COOKIE_NAME};

/// Authentication error response
#[derive(Debug)]
pub struct AuthError {
    pub status: StatusCode,
    pub error: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl AuthError {
    pub fn required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "AUTH_REQUIRED",
            message: "Authentication required".to_string(),
        }
    }

    pub fn expired() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "TOKEN_EXPIRED",
            message: "Session has expired".to_string(),
        }
    }

    pub fn invalid() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "TOKEN_INVALID",
            message: "Invalid session token".to_string(),
        }
    }

    pub fn origin_not_allowed() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            code: "ORIGIN_NOT_ALLOWED",
            message: "Request origin not allowed".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.error,
            "code": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Shared auth state for middleware
#[derive(Clone)]
pub struct AuthState {
    pub auth_manager: Arc<AuthManager>,
    pub allowed_origins: AllowedOrigins,
}

/// Authentication middleware
///
/// Accepts a session JWT from `Authorization: Bearer` or the session cookie.
/// With auth disabled every request acts as the local default user.
/// Injects `AuthContext` into request extensions.
pub async fn require_auth(
    State(state): State<AuthState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if !state.auth_manager.is_enabled() {
        request.extensions_mut().insert(AuthContext::LocalDefault {
            username: DEFAULT_USER_ID.to_string(),
        });
        return Ok(next.run(request).await);
    }

    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    // Origin check applies to cookie sessions only
    if bearer.is_none() {
        let origin = request
            .headers()
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .or_else(|| {
                request
                    .headers()
                    .get(header::REFERER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|referer| {
                        let origin = AllowedOrigins::origin_of_referer(referer);
                        if origin.is_none() {
                            tracing::debug!(referer = %referer, "Failed to parse Referer URL");
                        }
                        origin
                    })
            });

        if let Some(origin) = origin
            && !state.allowed_origins.is_allowed(&origin)
        {
            tracing::warn!("Rejected request from disallowed origin: {}", origin);
            return Err(AuthError::origin_not_allowed());
        }
    }

    let jwt = match bearer {
        Some(token) => token,
        None => jar
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .ok_or_else(AuthError::required)?,
    };

    let claims = state
        .auth_manager
        .validate_session(&jwt)
        .map_err(|e| match e {
            JwtError::Expired => AuthError::expired(),
            _ => AuthError::invalid(),
        })?;

    request.extensions_mut().insert(AuthContext::Session {
        username: claims.username().to_string(),
    });

    Ok(next.run(request).await)
}
