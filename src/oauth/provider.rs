//! Identity provider client
//!
//! The flow handler talks to the provider only through [`IdentityProvider`];
//! [`GoogleProvider`] is the production implementation.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::{Client, Url, header};

use crate::http_client::{HttpClientOptions, build_client};
use crate::model::settings::GoogleSettings;

use super::types::{TokenResponse, UserInfo};

const SCOPES: &str = "openid email profile";

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authorization endpoint URL carrying `state` and `redirect_uri`
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String>;

    /// Exchange an authorization code for an access token
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String>;

    /// Fetch the signed-in user's profile
    async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo>;
}

/// Google OAuth 2.0 / OpenID Connect client
pub struct GoogleProvider {
    settings: GoogleSettings,
    client: Client,
}

impl GoogleProvider {
    pub fn new(settings: GoogleSettings, http: &HttpClientOptions) -> Result<Self> {
        let client = build_client(http)?;
        Ok(Self { settings, client })
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &self.settings.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.settings.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("scope", SCOPES),
                ("state", state),
            ],
        )
        .context("Invalid authorize URL")?;
        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.settings.token_url)
            .header(header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
            ])
            .send()
            .await
            .context("Token request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Token endpoint returned {}: {}", status, body);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Invalid token response")?;

        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow!("Token response has no access_token"))
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<UserInfo> {
        let response = self
            .client
            .get(&self.settings.userinfo_url)
            .bearer_auth(access_token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .context("Userinfo request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Userinfo endpoint returned {}: {}", status, body);
        }

        response.json().await.context("Invalid userinfo response")
    }
}
