//! Identity extractors for Axum handlers
//!
//! `require_auth` stores an [`AuthContext`] in the request extensions;
//! [`CurrentUser`] turns it into the [`UserData`] survey operations expect.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use super::context::AuthContext;
use crate::api::types::ApiError;
use crate::domain::surveys::UserData;

/// Rejection type for auth extractors
#[derive(Debug)]
pub enum AuthRejection {
    /// Auth context not available (middleware not applied)
    MissingContext,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::MissingContext => {
                tracing::error!("Auth context missing, route is not behind require_auth");
                ApiError::internal("Auth context not available").into_response()
            }
        }
    }
}

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserData);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .map(|auth| Self(auth.user_data()))
            .ok_or(AuthRejection::MissingContext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    #[tokio::test]
    async fn test_current_user_from_context() {
        let mut request = Request::new(Body::empty());
        request.extensions_mut().insert(AuthContext::Session {
            username: "alice".into(),
        });
        let (mut parts, _) = request.into_parts();
        let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_missing_context_is_internal_error() {
        let (mut parts, _) = Request::new(Body::empty()).into_parts();
        let rejection = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(
            rejection.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
