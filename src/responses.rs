use axum::{
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct JsonResponse {
    pub status: String,
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    fn build(status_code: StatusCode, success: bool, msg: &str) -> impl IntoResponse {
        (
            status_code,
            Json(JsonResponse {
                status: if success { "success" } else { "error" }.to_string(),
                success,
                message: msg.to_string(),
            }),
        )
    }

    pub fn success(msg: &str) -> impl IntoResponse {
        Self::build(StatusCode::OK, true, msg)
    }

    pub fn server_error(msg: &str) -> impl IntoResponse {
        Self::build(StatusCode::INTERNAL_SERVER_ERROR, false, msg)
    }

    pub fn too_many_requests(msg: &str) -> impl IntoResponse {
        Self::build(StatusCode::TOO_MANY_REQUESTS, false, msg)
    }
}

/// Plain `302 Found`. Browsers follow it with a GET, which is what the login
/// round-trips rely on.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;
    use serde_json::from_slice;

    use crate::responses::{found, JsonResponse};

    #[tokio::test]
    async fn test_success_response() {
        let resp = JsonResponse::success("ok").into_response();
        assert_eq!(resp.status(), axum::http::StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: JsonResponse = from_slice(&body).unwrap();
        assert_eq!(json.status, "success");
        assert!(json.success);
        assert_eq!(json.message, "ok");
    }

    #[tokio::test]
    async fn test_server_error_response() {
        let resp = JsonResponse::server_error("boom").into_response();
        assert_eq!(resp.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: JsonResponse = from_slice(&body).unwrap();
        assert_eq!(json.status, "error");
        assert!(!json.success);
        assert_eq!(json.message, "boom");
    }

    #[test]
    fn test_found_redirect() {
        let resp = found("/forbidden");
        assert_eq!(resp.status(), axum::http::StatusCode::FOUND);
        assert_eq!(resp.headers().get("location").unwrap(), "/forbidden");
    }
}
