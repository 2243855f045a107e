//! Immutable runtime settings derived from [`Config`]
//!
//! Built once at startup and handed to the flow handler; nothing reads the
//! environment after this point.

use anyhow::{Context, bail};
use reqwest::Url;

use crate::common::auth::random_token;
use crate::http_client::HttpClientOptions;

use super::config::Config;

/// Google OAuth client registration and endpoints
#[derive(Debug, Clone)]
pub struct GoogleSettings {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

/// Where the session signing secret came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Configured,
    /// Random per-process secret; sessions die with the process
    Ephemeral,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// `None` when client id or secret is missing
    pub google: Option<GoogleSettings>,
    pub secret_key: String,
    pub secret_source: SecretSource,
    pub secure_cookies: bool,
    pub http: HttpClientOptions,
}

impl AuthSettings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        validate_url("googleAuthorizeUrl", &config.google_authorize_url)?;
        validate_url("googleTokenUrl", &config.google_token_url)?;
        validate_url("googleUserinfoUrl", &config.google_userinfo_url)?;

        let google = config
            .google_credentials()
            .map(|(client_id, client_secret)| GoogleSettings {
                client_id: client_id.to_string(),
                client_secret: client_secret.to_string(),
                authorize_url: config.google_authorize_url.clone(),
                token_url: config.google_token_url.clone(),
                userinfo_url: config.google_userinfo_url.clone(),
            });

        let configured_secret = config
            .auth_secret_key
            .as_deref()
            .filter(|k| !k.trim().is_empty());

        let (secret_key, secret_source) = match configured_secret {
            Some(key) => (key.to_string(), SecretSource::Configured),
            None if config.is_production() => {
                bail!("authSecretKey / AUTH_SECRET_KEY must be set in production")
            }
            None => (random_token(32), SecretSource::Ephemeral),
        };

        Ok(Self {
            google,
            secret_key,
            secret_source,
            secure_cookies: config.is_production(),
            http: HttpClientOptions::from_config(config),
        })
    }
}

/// Endpoint URLs must be absolute http(s) URLs
fn validate_url(key: &str, value: &str) -> anyhow::Result<()> {
    let url = Url::parse(value).with_context(|| format!("Invalid {}: {}", key, value))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Invalid {}: unsupported scheme {}", key, url.scheme());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_secret_is_used() {
        let config = Config {
            auth_secret_key: Some("stable".to_string()),
            ..Config::default()
        };
        let settings = AuthSettings::from_config(&config).unwrap();
        assert_eq!(settings.secret_key, "stable");
        assert_eq!(settings.secret_source, SecretSource::Configured);
        assert!(!settings.secure_cookies);
        assert!(settings.google.is_none());
    }

    #[test]
    fn test_missing_secret_is_ephemeral_outside_production() {
        let a = AuthSettings::from_config(&Config::default()).unwrap();
        let b = AuthSettings::from_config(&Config::default()).unwrap();
        assert_eq!(a.secret_source, SecretSource::Ephemeral);
        assert_ne!(a.secret_key, b.secret_key);
    }

    #[test]
    fn test_missing_secret_is_rejected_in_production() {
        let config = Config {
            environment: Some("production".to_string()),
            ..Config::default()
        };
        assert!(AuthSettings::from_config(&config).is_err());
    }

    #[test]
    fn test_production_enables_secure_cookies() {
        let config = Config {
            environment: Some("production".to_string()),
            auth_secret_key: Some("stable".to_string()),
            ..Config::default()
        };
        assert!(AuthSettings::from_config(&config).unwrap().secure_cookies);
    }

    #[test]
    fn test_google_settings_carry_endpoints() {
        let config = Config {
            google_client_id: Some("id".to_string()),
            google_client_secret: Some("secret".to_string()),
            google_token_url: "http://127.0.0.1:9/token".to_string(),
            ..Config::default()
        };
        let google = AuthSettings::from_config(&config).unwrap().google.unwrap();
        assert_eq!(google.client_id, "id");
        assert_eq!(google.token_url, "http://127.0.0.1:9/token");
        assert_eq!(google.authorize_url, crate::model::config::GOOGLE_AUTHORIZE_URL);
    }

    #[test]
    fn test_malformed_endpoint_url_is_rejected() {
        let config = Config {
            google_client_id: Some("id".to_string()),
            google_client_secret: Some("secret".to_string()),
            google_authorize_url: "not a url".to_string(),
            ..Config::default()
        };
        let err = AuthSettings::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("googleAuthorizeUrl"));
    }

    #[test]
    fn test_non_http_endpoint_url_is_rejected() {
        let config = Config {
            google_userinfo_url: "ftp://example.com/userinfo".to_string(),
            ..Config::default()
        };
        assert!(AuthSettings::from_config(&config).is_err());
    }
}
