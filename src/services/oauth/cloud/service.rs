// services/oauth/cloud/service.rs

use super::{
    errors::CloudAuthError,
    models::{CloudUserInfo, InstanceMetadata, TokenSet},
};
use async_trait::async_trait;

/// Everything the token endpoint needs for an authorization-code grant.
#[derive(Debug, Clone, Copy)]
pub struct TokenRequest<'a> {
    pub server_host: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub code: &'a str,
    pub redirect_uri: &'a str,
}

#[async_trait]
pub trait CloudOAuthService: Send + Sync {
    async fn exchange_code_for_token(
        &self,
        request: TokenRequest<'_>,
    ) -> Result<TokenSet, CloudAuthError>;

    async fn fetch_user_info(
        &self,
        server_host: &str,
        access_token: &str,
    ) -> Result<CloudUserInfo, CloudAuthError>;

    async fn register_instance(
        &self,
        server_host: &str,
        access_token: &str,
        metadata: &InstanceMetadata,
    ) -> Result<(), CloudAuthError>;
}

pub fn auth_server_url(scheme: &str, server_host: &str, path: &str) -> String {
    format!("{scheme}://{server_host}{path}")
}
