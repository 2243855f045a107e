//! Outbound HTTP client construction
//!
//! Builds the reqwest client used for the identity provider calls.

use reqwest::{Client, Proxy, redirect};
use std::time::Duration;

use crate::model::config::{Config, TlsBackend};

/// Proxy configuration
#[derive(Debug, Clone, Default)]
pub struct ProxyConfig {
    /// Proxy URL, supports http/https/socks5
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// Settings shared by every outbound request
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    pub timeout: Duration,
    pub tls_backend: TlsBackend,
    pub proxy: Option<ProxyConfig>,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            tls_backend: TlsBackend::Rustls,
            proxy: None,
        }
    }
}

impl HttpClientOptions {
    pub fn from_config(config: &Config) -> Self {
        let proxy = config.proxy_url.as_ref().map(|url| {
            let proxy = ProxyConfig::new(url);
            match (&config.proxy_username, &config.proxy_password) {
                (Some(username), Some(password)) => proxy.with_auth(username, password),
                _ => proxy,
            }
        });

        Self {
            timeout: Duration::from_secs(config.request_timeout_secs),
            tls_backend: config.tls_backend,
            proxy,
        }
    }
}

/// Build HTTP Client
///
/// Redirects are not followed: a token endpoint answering with a redirect
/// is treated as a failed exchange.
pub fn build_client(options: &HttpClientOptions) -> anyhow::Result<Client> {
    let mut builder = Client::builder()
        .timeout(options.timeout)
        .redirect(redirect::Policy::none());

    if options.tls_backend == TlsBackend::Rustls {
        builder = builder.use_rustls_tls();
    }

    if let Some(proxy_config) = &options.proxy {
        let mut proxy = Proxy::all(&proxy_config.url)?;

        if let (Some(username), Some(password)) = (&proxy_config.username, &proxy_config.password) {
            proxy = proxy.basic_auth(username, password);
        }

        builder = builder.proxy(proxy);
        tracing::debug!("HTTP Client using proxy: {}", proxy_config.url);
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let config = Config {
            request_timeout_secs: 5,
            proxy_url: Some("socks5://127.0.0.1:1080".to_string()),
            proxy_username: Some("user".to_string()),
            proxy_password: Some("pass".to_string()),
            ..Config::default()
        };
        let options = HttpClientOptions::from_config(&config);
        assert_eq!(options.timeout, Duration::from_secs(5));
        let proxy = options.proxy.unwrap();
        assert_eq!(proxy.url, "socks5://127.0.0.1:1080");
        assert_eq!(proxy.username.as_deref(), Some("user"));
        assert_eq!(proxy.password.as_deref(), Some("pass"));
    }

    #[test]
    fn test_proxy_without_password_has_no_auth() {
        let config = Config {
            proxy_url: Some("http://127.0.0.1:7890".to_string()),
            proxy_username: Some("user".to_string()),
            ..Config::default()
        };
        let proxy = HttpClientOptions::from_config(&config).proxy.unwrap();
        assert!(proxy.username.is_none());
    }

    #[test]
    fn test_build_client_without_proxy() {
        assert!(build_client(&HttpClientOptions::default()).is_ok());
    }

    #[test]
    fn test_build_client_with_proxy() {
        let options = HttpClientOptions {
            proxy: Some(ProxyConfig::new("http://127.0.0.1:7890")),
            ..HttpClientOptions::default()
        };
        assert!(build_client(&options).is_ok());
    }
}
