// services/oauth/cloud/client.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};

use super::{
    errors::CloudAuthError,
    models::{CloudUserInfo, InstanceMetadata, TokenSet},
    service::{auth_server_url, CloudOAuthService, TokenRequest},
};

const INSTANCE_REGISTRATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct CloudOAuthClient {
    pub client: Client,
    pub scheme: String,
    instance_timeout: Duration,
}

impl CloudOAuthClient {
    pub fn new(client: Client, scheme: impl Into<String>) -> Self {
        Self {
            client,
            scheme: scheme.into(),
            instance_timeout: INSTANCE_REGISTRATION_TIMEOUT,
        }
    }

    /// Overrides the 5 second cap on the instance registration call.
    pub fn with_instance_timeout(mut self, timeout: Duration) -> Self {
        self.instance_timeout = timeout;
        self
    }

    fn url(&self, server_host: &str, path: &str) -> String {
        auth_server_url(&self.scheme, server_host, path)
    }
}

#[async_trait]
impl CloudOAuthService for CloudOAuthClient {
    async fn exchange_code_for_token(
        &self,
        request: TokenRequest<'_>,
    ) -> Result<TokenSet, CloudAuthError> {
        let res = self
            .client
            .post(self.url(request.server_host, "/auth/token"))
            .basic_auth(request.client_id, Some(request.client_secret))
            .form(&[
                ("code", request.code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", request.redirect_uri),
            ])
            .send()
            .await
            .map_err(|_| CloudAuthError::TokenExchangeFailed)?;

        if !res.status().is_success() {
            return Err(CloudAuthError::TokenExchangeRejected(res.status()));
        }

        let raw: Map<String, Value> = res
            .json()
            .await
            .map_err(|_| CloudAuthError::InvalidTokenJson)?;

        TokenSet::from_token_response(raw, chrono::Utc::now().timestamp())
    }

    async fn fetch_user_info(
        &self,
        server_host: &str,
        access_token: &str,
    ) -> Result<CloudUserInfo, CloudAuthError> {
        let res = self
            .client
            .get(self.url(server_host, "/auth/userinfo"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|_| CloudAuthError::UserInfoFetchFailed)?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            return Err(CloudAuthError::UserInfoFailed { status, body });
        }

        res.json()
            .await
            .map_err(|_| CloudAuthError::InvalidUserInfo)
    }

    async fn register_instance(
        &self,
        server_host: &str,
        access_token: &str,
        metadata: &InstanceMetadata,
    ) -> Result<(), CloudAuthError> {
        let res = self
            .client
            .put(self.url(server_host, "/cloud/instance"))
            .bearer_auth(access_token)
            .json(metadata)
            .timeout(self.instance_timeout)
            .send()
            .await
            .map_err(CloudAuthError::InstanceRegistrationTransport)?;

        if res.status() != StatusCode::OK {
            return Err(CloudAuthError::InstanceRegistrationFailed(res.status()));
        }

        Ok(())
    }
}
