use axum::{extract::State, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;

use crate::responses::JsonResponse;
use crate::session::clear_session_cookie;
use crate::state::AppState;

pub async fn handle_logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (
        clear_session_cookie(jar, state.config.session_cookie_secure),
        JsonResponse::success("Logged out"),
    )
}
