pub mod callback;
pub mod claims;
pub mod cloud_login;
pub mod logout;
pub mod session;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub use callback::cloud_callback;
pub use cloud_login::cloud_login;
pub use logout::handle_logout;
pub use session::handle_session;

/// Routes mounted under `/api/auth`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/callback", get(cloud_callback))
        .route("/callback/cloud_home", get(cloud_callback))
        .route("/cloud_login", get(cloud_login))
        .route("/session", get(handle_session))
        .route("/logout", post(handle_logout))
}
