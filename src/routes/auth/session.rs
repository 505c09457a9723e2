use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::routes::auth::claims::SessionClaims;
use crate::session::SESSION_COOKIE;
use crate::state::AppState;
use crate::utils::jwt::decode_jwt;

#[derive(Debug, PartialEq)]
pub struct CurrentSession(pub SessionClaims);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).ok_or(StatusCode::UNAUTHORIZED)?;

        let claims =
            decode_jwt(token.value(), &state.session_keys).map_err(|_| StatusCode::UNAUTHORIZED)?;

        Ok(CurrentSession(claims.claims))
    }
}

pub async fn handle_session(CurrentSession(claims): CurrentSession) -> Response {
    Json(json!({
        "username": claims.username,
        "auth_provider": claims.auth_provider,
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        routing::get,
        Router,
    };
    use axum_extra::extract::cookie::Cookie;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::test_config,
        db::memory_settings_repository::InMemorySettingsRepository,
        services::oauth::cloud::mock_cloud_oauth::MockCloudOAuth,
        utils::jwt::{create_jwt, test_keys},
    };

    fn app() -> Router {
        let state = AppState {
            settings: Arc::new(InMemorySettingsRepository::default()),
            cloud_oauth: Arc::new(MockCloudOAuth::for_user("alice")),
            session_keys: Arc::new(test_keys()),
            config: Arc::new(test_config()),
        };
        Router::new()
            .route("/api/auth/session", get(handle_session))
            .with_state(state)
    }

    fn valid_token() -> String {
        let claims = SessionClaims {
            username: "alice".into(),
            auth_provider: "cloud".into(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        create_jwt(&claims, &test_keys()).expect("JWT should create successfully")
    }

    #[tokio::test]
    async fn valid_session_returns_identity() {
        let cookie = Cookie::new(SESSION_COOKIE, valid_token());
        let response = app()
            .oneshot(
                Request::get("/api/auth/session")
                    .header(header::COOKIE, cookie.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["auth_provider"], "cloud");
    }

    #[tokio::test]
    async fn missing_cookie_returns_unauthorized() {
        let response = app()
            .oneshot(
                Request::get("/api/auth/session")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_returns_unauthorized() {
        let cookie = Cookie::new(SESSION_COOKIE, "invalid.token.here");
        let response = app()
            .oneshot(
                Request::get("/api/auth/session")
                    .header(header::COOKIE, cookie.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
