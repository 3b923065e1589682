//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::auth::{AuthManager, AuthState};
use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{auth, health, surveys};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::domain::SurveyService;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Serve until shutdown is triggered and in-flight requests drain
    pub async fn start(self) -> Result<()> {
        let app = self.app;
        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let allowed_origins = AllowedOrigins::new(&host, port);
        let router = build_router(app.surveys.clone(), app.auth.clone(), allowed_origins);

        let listener = TcpListener::bind(addr).await?;
        tracing::debug!(%addr, "API server listening");
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(())
    }
}

/// Full application router
pub fn build_router(
    surveys: SurveyService,
    auth_manager: Arc<AuthManager>,
    allowed_origins: AllowedOrigins,
) -> Router {
    let auth_state = AuthState {
        auth_manager: auth_manager.clone(),
        allowed_origins: allowed_origins.clone(),
    };
    let health_state = health::HealthState {
        auth_enabled: auth_manager.is_enabled(),
        limits: surveys.limits(),
    };

    Router::new()
        .route(
            "/api/health",
            get(health::health).with_state(health_state),
        )
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .route("/api/docs/", get(swagger_ui_html))
        .nest("/api/auth", auth::routes(auth_manager))
        .nest("/api/surveyManage", surveys::routes(surveys, auth_state))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors(&allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::core::config::AuthConfig;
    use crate::data::MemoryRepository;
    use crate::domain::query::{QueryExpressionCompiler, QueryLimits};

    fn router() -> (Router, Arc<AuthManager>) {
        let surveys = SurveyService::new(
            Arc::new(MemoryRepository::new()),
            QueryExpressionCompiler::surveys(),
            QueryLimits::default(),
        );
        let auth = Arc::new(
            AuthManager::init(&AuthConfig {
                enabled: true,
                signing_key: None,
            })
            .unwrap(),
        );
        let router = build_router(
            surveys,
            auth.clone(),
            AllowedOrigins::new("127.0.0.1", 5390),
        );
        (router, auth)
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = router();
        let response = router
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["service"], "surveyseat");
        assert_eq!(body["authEnabled"], true);
        assert_eq!(
            body["queryLimits"]["maxDepth"],
            QueryLimits::default().max_depth
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (router, _) = router();
        let response = router
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_exchange_sets_session_cookie() {
        let (router, auth) = router();
        let token = auth.bootstrap_token().unwrap().to_string();
        let request = Request::post("/api/auth/exchange")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "token": token }).to_string()))
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("surveyseat_session="));

        let request = Request::get("/api/surveyManage/list")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_exchange_rejects_wrong_token() {
        let (router, _) = router();
        let request = Request::post("/api/auth/exchange")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"token":"wrong"}"#))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
