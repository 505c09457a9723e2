// services/oauth/cloud/models.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::CloudAuthError;

#[derive(Debug, Deserialize)]
pub struct CloudCallback {
    pub code: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CloudLoginParams {
    pub location: Option<String>,
}

/// Tokens as stored in settings. Provider fields this service does not
/// interpret (`token_type`, `id_token`, `scope`, ...) ride along in `extra`.
///
/// A stored set may lack `access_token` (an empty `"tokens": {}` is accepted);
/// only a fresh `/auth/token` response is required to carry one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    #[serde(default)]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenSet {
    /// Builds a token set from a raw `/auth/token` response. A relative
    /// `expires_in` becomes `expires_at = now + expires_in - 1` and is dropped.
    pub fn from_token_response(
        mut raw: Map<String, Value>,
        now: i64,
    ) -> Result<Self, CloudAuthError> {
        if let Some(expires_in) = raw.remove("expires_in") {
            let seconds = expires_in
                .as_f64()
                .ok_or(CloudAuthError::InvalidTokenJson)?;
            let expires_at = (now as f64 + seconds - 1.0).round() as i64;
            raw.insert("expires_at".into(), Value::from(expires_at));
        }

        if !raw.get("access_token").is_some_and(Value::is_string) {
            return Err(CloudAuthError::MissingAccessToken);
        }

        serde_json::from_value(Value::Object(raw)).map_err(|_| CloudAuthError::InvalidTokenJson)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CloudUserInfo {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceMetadata {
    pub instance_id: String,
    pub public_hostname: String,
    pub ami_id: Option<String>,
}
