pub mod auth;

use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{responses::JsonResponse, state::AppState};

/// Assembles the application. `auth_routes` is taken from the caller so the
/// binary can wrap it in a rate limiter that needs peer addresses.
pub fn app_router(state: AppState, auth_routes: Router<AppState>) -> Router {
    Router::new()
        .route("/", get(root_index))
        .nest("/api/auth", auth_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Landing page the plain callback redirects to.
async fn root_index() -> Response {
    JsonResponse::success("Cloud auth backend is running").into_response()
}
