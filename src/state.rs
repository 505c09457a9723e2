use crate::config::Config;
use crate::db::settings_repository::SettingsRepository;
use crate::services::oauth::cloud::service::CloudOAuthService;
use crate::utils::jwt::SessionKeys;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<dyn SettingsRepository>,
    pub cloud_oauth: Arc<dyn CloudOAuthService>,
    pub session_keys: Arc<SessionKeys>,
    pub config: Arc<Config>,
}
