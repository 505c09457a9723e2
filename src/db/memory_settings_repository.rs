use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::db::settings_repository::{apply_cloud_binding, BindOutcome, SettingsRepository};
use crate::models::settings::{AppSettings, SettingsError};
use crate::services::oauth::cloud::models::TokenSet;

#[derive(Default)]
pub struct InMemorySettingsRepository {
    settings: RwLock<AppSettings>,
}

impl InMemorySettingsRepository {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    pub async fn snapshot(&self) -> AppSettings {
        self.settings.read().await.clone()
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load(&self) -> Result<AppSettings, SettingsError> {
        Ok(self.snapshot().await)
    }

    async fn bind_cloud_account(
        &self,
        username: &str,
        tokens: &TokenSet,
    ) -> Result<BindOutcome, SettingsError> {
        let mut settings = self.settings.write().await;
        Ok(apply_cloud_binding(&mut settings, username, tokens))
    }
}
