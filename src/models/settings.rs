use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::services::oauth::cloud::models::{InstanceMetadata, TokenSet};

pub const CLOUD_PROVIDER: &str = "cloud";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("missing settings key: {0}")]
    MissingKey(&'static str),
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The process-wide settings document. Keys this service does not own are
/// carried in `extra` so a write never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub aws_meta_data: AwsMetaData,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AwsMetaData {
    #[serde(
        rename = "public-hostname",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub public_hostname: Option<String>,
    #[serde(
        rename = "instance-id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub instance_id: Option<String>,
    #[serde(rename = "ami-id", default, skip_serializing_if = "Option::is_none")]
    pub ami_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default)]
    pub oauth: OAuthSettings,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenSet>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Validated view over the keys the cloud login flow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudLoginSettings {
    pub public_hostname: String,
    pub client_id: String,
    pub client_secret: String,
    pub server_host: String,
}

fn required(value: &Option<String>, key: &'static str) -> Result<String, SettingsError> {
    value.clone().ok_or(SettingsError::MissingKey(key))
}

impl AppSettings {
    pub fn cloud_login(&self) -> Result<CloudLoginSettings, SettingsError> {
        let oauth = &self.auth.oauth;
        Ok(CloudLoginSettings {
            public_hostname: required(
                &self.aws_meta_data.public_hostname,
                "aws_meta_data.public-hostname",
            )?,
            client_id: required(&oauth.client_id, "auth.oauth.client_id")?,
            client_secret: required(&oauth.client_secret, "auth.oauth.client_secret")?,
            server_host: required(&oauth.server_host, "auth.oauth.server_host")?,
        })
    }

    pub fn instance_metadata(&self) -> Result<InstanceMetadata, SettingsError> {
        Ok(InstanceMetadata {
            instance_id: required(&self.aws_meta_data.instance_id, "aws_meta_data.instance-id")?,
            public_hostname: required(
                &self.aws_meta_data.public_hostname,
                "aws_meta_data.public-hostname",
            )?,
            ami_id: self.aws_meta_data.ami_id.clone(),
        })
    }
}

#[cfg(test)]
pub(crate) fn test_settings(server_host: &str) -> AppSettings {
    let mut settings = AppSettings::default();
    settings.aws_meta_data.public_hostname = Some("instance.example.com".into());
    settings.aws_meta_data.instance_id = Some("i-0abc123".into());
    settings.aws_meta_data.ami_id = Some("ami-42".into());
    settings.auth.oauth.client_id = Some("client".into());
    settings.auth.oauth.client_secret = Some("secret".into());
    settings.auth.oauth.server_host = Some(server_host.into());
    settings
}
