// services/oauth/cloud/errors.rs
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::settings::SettingsError;

#[derive(Debug, Error)]
pub enum CloudAuthError {
    #[error("cloud token exchange failed")]
    TokenExchangeFailed,
    #[error("cloud token exchange returned status {0}")]
    TokenExchangeRejected(StatusCode),
    #[error("invalid cloud token response")]
    InvalidTokenJson,
    #[error("cloud token response has no access token")]
    MissingAccessToken,
    #[error("failed to fetch cloud user info")]
    UserInfoFetchFailed,
    #[error("wrong userinfo response: {status}, {body}")]
    UserInfoFailed { status: StatusCode, body: String },
    #[error("invalid cloud user info")]
    InvalidUserInfo,
    #[error("wrong response from cloud server: {0}")]
    InstanceRegistrationFailed(StatusCode),
    #[error("can't send request to cloud server: {0}")]
    InstanceRegistrationTransport(#[source] reqwest::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
