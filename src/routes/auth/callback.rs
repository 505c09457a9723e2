use axum::{
    extract::{OriginalUri, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, warn};

use crate::{
    db::settings_repository::BindOutcome,
    models::settings::CLOUD_PROVIDER,
    responses::{found, JsonResponse},
    services::oauth::cloud::{
        errors::CloudAuthError,
        models::CloudCallback,
        service::{auth_server_url, TokenRequest},
    },
    session::SessionContext,
    state::AppState,
};

pub const FORBIDDEN_PATH: &str = "/forbidden";
pub const ROOT_INDEX_PATH: &str = "/";
const CLOUD_HOME_SUFFIX: &str = "/auth/callback/cloud_home";

#[derive(Debug)]
pub enum LoginOutcome {
    Authorized {
        session: SessionContext,
        redirect_to: String,
    },
    /// The instance is bound to another cloud user; nothing was persisted.
    Forbidden,
}

/// Runs the authorization-code flow for one callback hit. `request_path` is
/// the path the provider redirected to; it is echoed back as `redirect_uri`.
pub async fn complete_cloud_login(
    state: &AppState,
    code: &str,
    request_path: &str,
) -> Result<LoginOutcome, CloudAuthError> {
    let settings = state.settings.load().await?;
    let login = settings.cloud_login()?;
    let instance = settings.instance_metadata()?;

    let redirect_uri = format!("https://{}{}", login.public_hostname, request_path);
    let tokens = state
        .cloud_oauth
        .exchange_code_for_token(TokenRequest {
            server_host: &login.server_host,
            client_id: &login.client_id,
            client_secret: &login.client_secret,
            code,
            redirect_uri: &redirect_uri,
        })
        .await?;

    let user = state
        .cloud_oauth
        .fetch_user_info(&login.server_host, &tokens.access_token)
        .await?;

    match state
        .settings
        .bind_cloud_account(&user.name, &tokens)
        .await?
    {
        BindOutcome::Bound => {}
        BindOutcome::UsernameMismatch { previous } => {
            warn!(
                previous_username = %previous,
                new_username = %user.name,
                "Cloud login rejected: instance is bound to another user"
            );
            return Ok(LoginOutcome::Forbidden);
        }
    }

    if let Err(e) = state
        .cloud_oauth
        .register_instance(&login.server_host, &tokens.access_token, &instance)
        .await
    {
        warn!(error = %e, instance_id = %instance.instance_id, "Cloud instance registration failed");
    }

    let mut session = SessionContext::new();
    session.set_username(user.name.clone());
    session.set_auth_provider(CLOUD_PROVIDER);
    session.set_permanent(true);

    let redirect_to = if request_path.ends_with(CLOUD_HOME_SUFFIX) {
        auth_server_url(&state.config.auth_server_scheme, &login.server_host, "")
    } else {
        ROOT_INDEX_PATH.to_string()
    };

    info!(username = %user.name, "Cloud login completed");
    Ok(LoginOutcome::Authorized {
        session,
        redirect_to,
    })
}

/// Handles both `/auth/callback` and `/auth/callback/cloud_home`.
pub async fn cloud_callback(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    jar: CookieJar,
    Query(params): Query<CloudCallback>,
) -> Response {
    match complete_cloud_login(&state, &params.code, uri.path()).await {
        Ok(LoginOutcome::Authorized {
            session,
            redirect_to,
        }) => match session.commit(
            jar,
            &state.session_keys,
            state.config.session_cookie_secure,
        ) {
            Ok(jar) => (jar, found(&redirect_to)).into_response(),
            Err(e) => {
                error!(error = %e, "Failed to create session");
                JsonResponse::server_error("Failed to create session").into_response()
            }
        },
        Ok(LoginOutcome::Forbidden) => found(FORBIDDEN_PATH),
        Err(e) => {
            error!(error = %e, path = %uri.path(), "Cloud login failed");
            JsonResponse::server_error("Cloud login failed").into_response()
        }
    }
}
