//! OAuth login flow
//!
//! Begin login, validate the provider callback, and turn the resulting
//! identity into a signed session token. All per-attempt state lives in the
//! state cookie; the handler itself is immutable and shared across requests.

use std::sync::Arc;

use http::HeaderMap;

use crate::common::auth::{base_url, constant_time_eq, random_token};
use crate::model::settings::{AuthSettings, SecretSource};
use crate::session::{CookiePolicy, Identity, SESSION_MAX_AGE_SECS, SessionCodec};

use super::error::LoginError;
use super::provider::{GoogleProvider, IdentityProvider};
use super::types::{CallbackParams, LoginRedirect};

pub const CALLBACK_PATH: &str = "/auth/callback/google";

const STATE_BYTES: usize = 32;

/// OAuth login flow handler
pub struct OAuthFlowHandler {
    /// `None` when Google credentials are not configured
    provider: Option<Arc<dyn IdentityProvider>>,
    codec: SessionCodec,
    cookies: CookiePolicy,
}

impl OAuthFlowHandler {
    pub fn new(settings: &AuthSettings) -> anyhow::Result<Self> {
        let provider = match &settings.google {
            Some(google) => {
                let provider = GoogleProvider::new(google.clone(), &settings.http)?;
                Some(Arc::new(provider) as Arc<dyn IdentityProvider>)
            }
            None => {
                tracing::warn!("Google OAuth credentials not set, login is disabled");
                None
            }
        };

        if settings.secret_source == SecretSource::Ephemeral {
            tracing::warn!(
                "AUTH_SECRET_KEY not set, using a random signing secret: sessions will not \
                 survive a restart or be shared between instances"
            );
        }

        Ok(Self::with_provider(
            provider,
            SessionCodec::new(&settings.secret_key),
            CookiePolicy::new(settings.secure_cookies),
        ))
    }

    pub fn with_provider(
        provider: Option<Arc<dyn IdentityProvider>>,
        codec: SessionCodec,
        cookies: CookiePolicy,
    ) -> Self {
        Self {
            provider,
            codec,
            cookies,
        }
    }

    pub fn cookies(&self) -> CookiePolicy {
        self.cookies
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Start a login attempt
    ///
    /// Returns the provider URL to redirect to and the fresh state value the
    /// caller must store in the state cookie.
    pub fn begin_login(&self, headers: &HeaderMap) -> Result<LoginRedirect, LoginError> {
        let provider = self.provider.as_ref().ok_or(LoginError::NotConfigured)?;

        let state = random_token(STATE_BYTES);
        let authorization_url = provider
            .authorization_url(&callback_uri(headers), &state)
            .map_err(|e| {
                tracing::error!("Failed to build authorization URL: {:#}", e);
                LoginError::ExchangeFailed(e)
            })?;

        Ok(LoginRedirect {
            authorization_url,
            state,
        })
    }

    /// Validate the provider callback and mint a session token
    ///
    /// Checks run in a fixed order (configuration, state, provider error,
    /// code) and the provider is contacted only once all of them pass.
    pub async fn complete_login(
        &self,
        params: &CallbackParams,
        stored_state: Option<&str>,
        headers: &HeaderMap,
    ) -> Result<(String, Identity), LoginError> {
        let provider = self.provider.as_ref().ok_or(LoginError::NotConfigured)?;

        let state = non_empty(&params.state).ok_or(LoginError::InvalidState)?;
        match stored_state {
            Some(stored) if constant_time_eq(state, stored) => {}
            _ => {
                tracing::warn!("OAuth callback rejected: state mismatch");
                return Err(LoginError::InvalidState);
            }
        }

        if let Some(error) = non_empty(&params.error) {
            tracing::warn!("OAuth callback carried provider error: {}", error);
            return Err(LoginError::Provider(error.to_string()));
        }

        let code = non_empty(&params.code).ok_or(LoginError::NoCode)?;

        let identity = self
            .exchange(provider.as_ref(), code, &callback_uri(headers))
            .await
            .map_err(|e| {
                tracing::error!("OAuth error: {:#}", e);
                LoginError::ExchangeFailed(e)
            })?;

        let token = self.codec.encode(&identity).map_err(|e| {
            tracing::error!("Failed to encode session: {:#}", e);
            LoginError::ExchangeFailed(e)
        })?;

        tracing::info!("OAuth login succeeded for user {}", identity.id);
        Ok((token, identity))
    }

    /// Identity carried by a session cookie value, if it is still valid
    pub fn current_user(&self, token: Option<&str>) -> Option<Identity> {
        self.codec.decode(token?, SESSION_MAX_AGE_SECS)
    }

    async fn exchange(
        &self,
        provider: &dyn IdentityProvider,
        code: &str,
        redirect_uri: &str,
    ) -> anyhow::Result<Identity> {
        let access_token = provider.exchange_code(code, redirect_uri).await?;
        let info = provider.fetch_user_info(&access_token).await?;
        Ok(info.into())
    }
}

fn callback_uri(headers: &HeaderMap) -> String {
    format!("{}{}", base_url(headers), CALLBACK_PATH)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
