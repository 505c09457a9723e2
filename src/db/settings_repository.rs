use async_trait::async_trait;

use crate::models::settings::{AppSettings, SettingsError, CLOUD_PROVIDER};
use crate::services::oauth::cloud::models::TokenSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    Bound,
    UsernameMismatch { previous: String },
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Current settings, read at call time.
    async fn load(&self) -> Result<AppSettings, SettingsError>;

    /// Binds the cloud account to this instance. The username check and the
    /// write happen under one lock; on mismatch nothing is written.
    async fn bind_cloud_account(
        &self,
        username: &str,
        tokens: &TokenSet,
    ) -> Result<BindOutcome, SettingsError>;
}

pub(crate) fn apply_cloud_binding(
    settings: &mut AppSettings,
    username: &str,
    tokens: &TokenSet,
) -> BindOutcome {
    if let Some(previous) = settings.auth.oauth.username.as_deref() {
        if previous != username {
            return BindOutcome::UsernameMismatch {
                previous: previous.to_string(),
            };
        }
    }

    settings.auth.provider = Some(CLOUD_PROVIDER.to_string());
    settings.auth.oauth.username = Some(username.to_string());
    settings.auth.oauth.tokens = Some(tokens.clone());
    BindOutcome::Bound
}
