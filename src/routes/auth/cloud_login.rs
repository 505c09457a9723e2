use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use base64::Engine;
use rand_core::{OsRng, RngCore};
use tracing::{error, info};
use url::{ParseError, Url};

use crate::{
    models::settings::CloudLoginSettings,
    responses::{found, JsonResponse},
    services::oauth::cloud::{models::CloudLoginParams, service::auth_server_url},
    state::AppState,
};

pub const CLOUD_SCOPE: &str = "openid profile aws_marketplace";
pub const CALLBACK_PATH: &str = "/api/auth/callback";
pub const CLOUD_HOME_CALLBACK_PATH: &str = "/api/auth/callback/cloud_home";
const CLOUD_HOME_LOCATION: &str = "cloud_home";

fn generate_nonce() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Builds the identity provider's authorize URL for this instance.
pub fn authorize_url(
    scheme: &str,
    settings: &CloudLoginSettings,
    location: Option<&str>,
    nonce: &str,
) -> Result<Url, ParseError> {
    let callback_path = if location == Some(CLOUD_HOME_LOCATION) {
        CLOUD_HOME_CALLBACK_PATH
    } else {
        CALLBACK_PATH
    };
    let redirect_uri = format!("https://{}{}", settings.public_hostname, callback_path);

    let mut url = Url::parse(&auth_server_url(
        scheme,
        &settings.server_host,
        "/auth/authorize",
    ))?;
    url.query_pairs_mut()
        .append_pair("client_id", &settings.client_id)
        .append_pair("scope", CLOUD_SCOPE)
        .append_pair("response_type", "code")
        .append_pair("nonce", nonce)
        .append_pair("redirect_uri", &redirect_uri);
    Ok(url)
}

/// Redirects the browser to the cloud login form.
pub async fn cloud_login(
    State(state): State<AppState>,
    Query(params): Query<CloudLoginParams>,
) -> Response {
    let settings = match state.settings.load().await.and_then(|s| s.cloud_login()) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Cloud login settings unavailable");
            return JsonResponse::server_error("Cloud login is not configured").into_response();
        }
    };

    let url = match authorize_url(
        &state.config.auth_server_scheme,
        &settings,
        params.location.as_deref(),
        &generate_nonce(),
    ) {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, server_host = %settings.server_host, "Invalid auth server host");
            return JsonResponse::server_error("Cloud login is not configured").into_response();
        }
    };

    info!(location = ?params.location, "Redirecting to cloud login");
    found(url.as_str())
}
