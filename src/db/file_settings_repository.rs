use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::db::settings_repository::{apply_cloud_binding, BindOutcome, SettingsRepository};
use crate::models::settings::{AppSettings, SettingsError};
use crate::services::oauth::cloud::models::TokenSet;

/// Settings kept as a JSON document on disk. Every read goes to the file so
/// edits made by other processes are picked up; writes go through a sibling
/// temp file and a rename.
pub struct FileSettingsRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSettingsRepository {
    /// Opens the document and checks that it parses.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let repo = Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        };
        repo.read().await?;
        info!(path = %repo.path.display(), "Loaded settings document");
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<AppSettings, SettingsError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let bytes = serde_json::to_vec_pretty(settings)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "Settings document written");
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for FileSettingsRepository {
    async fn load(&self) -> Result<AppSettings, SettingsError> {
        self.read().await
    }

    async fn bind_cloud_account(
        &self,
        username: &str,
        tokens: &TokenSet,
    ) -> Result<BindOutcome, SettingsError> {
        let _guard = self.write_lock.lock().await;

        let mut settings = self.read().await?;
        let outcome = apply_cloud_binding(&mut settings, username, tokens);
        if outcome == BindOutcome::Bound {
            self.write(&settings).await?;
        }
        Ok(outcome)
    }
}
