use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{
    errors::CloudAuthError,
    models::{CloudUserInfo, InstanceMetadata, TokenSet},
    service::{CloudOAuthService, TokenRequest},
};

/// Scripted identity provider. `user_info: None` answers userinfo with a 403,
/// `registration_status` other than 200 fails the instance PUT.
pub struct MockCloudOAuth {
    pub tokens: TokenSet,
    pub user_info: Option<CloudUserInfo>,
    pub registration_status: StatusCode,
    pub redirect_uris: Mutex<Vec<String>>,
    pub registrations: Mutex<Vec<InstanceMetadata>>,
}

impl MockCloudOAuth {
    pub fn for_user(name: &str) -> Self {
        Self {
            tokens: TokenSet {
                access_token: "access-token".into(),
                refresh_token: Some("refresh-token".into()),
                expires_at: Some(4_102_444_799),
                ..TokenSet::default()
            },
            user_info: Some(CloudUserInfo {
                name: name.into(),
                ..CloudUserInfo::default()
            }),
            registration_status: StatusCode::OK,
            redirect_uris: Mutex::new(Vec::new()),
            registrations: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CloudOAuthService for MockCloudOAuth {
    async fn exchange_code_for_token(
        &self,
        request: TokenRequest<'_>,
    ) -> Result<TokenSet, CloudAuthError> {
        self.redirect_uris
            .lock()
            .unwrap()
            .push(request.redirect_uri.to_string());
        Ok(self.tokens.clone())
    }

    async fn fetch_user_info(
        &self,
        _server_host: &str,
        _access_token: &str,
    ) -> Result<CloudUserInfo, CloudAuthError> {
        self.user_info
            .clone()
            .ok_or_else(|| CloudAuthError::UserInfoFailed {
                status: StatusCode::FORBIDDEN,
                body: "forbidden".into(),
            })
    }

    async fn register_instance(
        &self,
        _server_host: &str,
        _access_token: &str,
        metadata: &InstanceMetadata,
    ) -> Result<(), CloudAuthError> {
        self.registrations.lock().unwrap().push(metadata.clone());
        if self.registration_status != StatusCode::OK {
            return Err(CloudAuthError::InstanceRegistrationFailed(
                self.registration_status,
            ));
        }
        Ok(())
    }
}
