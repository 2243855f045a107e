use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TlsBackend {
    #[default]
    Rustls,
    NativeTls,
}

/// Application configuration
///
/// Read from a camelCase JSON file, then overridden by environment variables
/// (see [`Config::apply_env`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Google OAuth client ID
    #[serde(default)]
    pub google_client_id: Option<String>,

    /// Google OAuth client secret
    #[serde(default)]
    pub google_client_secret: Option<String>,

    /// Secret used to sign session cookies
    #[serde(default)]
    pub auth_secret_key: Option<String>,

    /// Deployment environment ("production" turns on secure cookies)
    #[serde(default)]
    pub environment: Option<String>,

    #[serde(default = "default_authorize_url")]
    pub google_authorize_url: String,

    #[serde(default = "default_token_url")]
    pub google_token_url: String,

    #[serde(default = "default_userinfo_url")]
    pub google_userinfo_url: String,

    /// Timeout for the token exchange and userinfo calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub tls_backend: TlsBackend,

    /// HTTP proxy URL (optional)
    /// Supported formats: http://host:port, https://host:port, socks5://host:port
    #[serde(default)]
    pub proxy_url: Option<String>,

    #[serde(default)]
    pub proxy_username: Option<String>,

    #[serde(default)]
    pub proxy_password: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_authorize_url() -> String {
    GOOGLE_AUTHORIZE_URL.to_string()
}

fn default_token_url() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

fn default_userinfo_url() -> String {
    GOOGLE_USERINFO_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            google_client_id: None,
            google_client_secret: None,
            auth_secret_key: None,
            environment: None,
            google_authorize_url: default_authorize_url(),
            google_token_url: default_token_url(),
            google_userinfo_url: default_userinfo_url(),
            request_timeout_secs: default_request_timeout_secs(),
            tls_backend: TlsBackend::default(),
            proxy_url: None,
            proxy_username: None,
            proxy_password: None,
        }
    }
}

impl Config {
    /// Get default config file path
    pub fn default_config_path() -> &'static str {
        "config.json"
    }

    /// Load configuration from file
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source
    ///
    /// Empty values are ignored so that an exported-but-blank variable does
    /// not clobber the file configuration.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("GOOGLE_CLIENT_ID") {
            self.google_client_id = Some(v);
        }
        if let Some(v) = get("GOOGLE_CLIENT_SECRET") {
            self.google_client_secret = Some(v);
        }
        if let Some(v) = get("AUTH_SECRET_KEY") {
            self.auth_secret_key = Some(v);
        }
        if let Some(v) = get("ENVIRONMENT").or_else(|| get("NODE_ENV")) {
            self.environment = Some(v);
        }
    }

    /// Whether cookies must carry the `Secure` attribute
    pub fn is_production(&self) -> bool {
        self.environment
            .as_deref()
            .map(|env| env.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false)
    }

    /// Google client credentials, if both halves are non-blank
    pub fn google_credentials(&self) -> Option<(&str, &str)> {
        let id = self.google_client_id.as_deref().map(str::trim)?;
        let secret = self.google_client_secret.as_deref().map(str::trim)?;
        if id.is_empty() || secret.is_empty() {
            return None;
        }
        Some((id, secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_from_empty_json() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.google_token_url, GOOGLE_TOKEN_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.tls_backend, TlsBackend::Rustls);
        assert!(config.google_credentials().is_none());
    }

    #[test]
    fn test_camel_case_keys() {
        let json = r#"{
            "port": 9000,
            "googleClientId": "id",
            "googleClientSecret": "secret",
            "authSecretKey": "key",
            "tlsBackend": "native-tls"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.google_credentials(), Some(("id", "secret")));
        assert_eq!(config.auth_secret_key.as_deref(), Some("key"));
        assert_eq!(config.tls_backend, TlsBackend::NativeTls);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/chatkit-auth/config.json").unwrap();
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config {
            google_client_id: Some("file-id".to_string()),
            ..Config::default()
        };
        config.apply_env_from(env(&[
            ("GOOGLE_CLIENT_ID", "env-id"),
            ("GOOGLE_CLIENT_SECRET", "env-secret"),
            ("AUTH_SECRET_KEY", "env-key"),
        ]));
        assert_eq!(config.google_credentials(), Some(("env-id", "env-secret")));
        assert_eq!(config.auth_secret_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = Config {
            google_client_id: Some("file-id".to_string()),
            ..Config::default()
        };
        config.apply_env_from(env(&[("GOOGLE_CLIENT_ID", "  ")]));
        assert_eq!(config.google_client_id.as_deref(), Some("file-id"));
    }

    #[test]
    fn test_environment_falls_back_to_node_env() {
        let mut config = Config::default();
        config.apply_env_from(env(&[("NODE_ENV", "Production")]));
        assert!(config.is_production());

        let mut config = Config::default();
        config.apply_env_from(env(&[("ENVIRONMENT", "staging"), ("NODE_ENV", "production")]));
        assert!(!config.is_production());
    }

    #[test]
    fn test_blank_credentials_are_not_configured() {
        let config = Config {
            google_client_id: Some("id".to_string()),
            google_client_secret: Some(" ".to_string()),
            ..Config::default()
        };
        assert!(config.google_credentials().is_none());
    }
}
