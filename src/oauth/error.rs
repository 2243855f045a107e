//! Login flow failures
//!
//! The browser is mid-navigation when these happen, so every variant maps to
//! a redirect to `/?error=<code>` rather than an HTTP error status.

use std::fmt;

#[derive(Debug)]
pub enum LoginError {
    /// Google client id or secret missing
    NotConfigured,

    /// `state` missing or not matching the state cookie
    InvalidState,

    /// Provider redirected back with `error=...`
    Provider(String),

    /// Callback carried no authorization code
    NoCode,

    /// Authorize URL, token exchange, userinfo fetch or session encoding failed
    ExchangeFailed(anyhow::Error),
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginError::NotConfigured => write!(f, "Google OAuth is not configured"),
            LoginError::InvalidState => write!(f, "OAuth state mismatch"),
            LoginError::Provider(error) => write!(f, "Provider returned error: {}", error),
            LoginError::NoCode => write!(f, "Callback has no authorization code"),
            LoginError::ExchangeFailed(e) => write!(f, "OAuth exchange failed: {:#}", e),
        }
    }
}

impl std::error::Error for LoginError {}

impl LoginError {
    /// Machine-readable tag placed in the redirect query string
    pub fn code(&self) -> &str {
        match self {
            LoginError::NotConfigured => "oauth_not_configured",
            LoginError::InvalidState => "invalid_state",
            LoginError::Provider(error) => error,
            LoginError::NoCode => "no_code",
            LoginError::ExchangeFailed(_) => "oauth_failed",
        }
    }

    /// Whether the failure happened after the state check passed, so the
    /// state cookie has been spent and must be cleared
    pub fn consumes_state(&self) -> bool {
        matches!(
            self,
            LoginError::Provider(_) | LoginError::NoCode | LoginError::ExchangeFailed(_)
        )
    }

    /// Redirect target shown to the browser
    pub fn redirect_location(&self) -> String {
        format!("/?error={}", urlencoding::encode(self.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(LoginError::NotConfigured.code(), "oauth_not_configured");
        assert_eq!(LoginError::InvalidState.code(), "invalid_state");
        assert_eq!(LoginError::NoCode.code(), "no_code");
        assert_eq!(
            LoginError::ExchangeFailed(anyhow::anyhow!("boom")).code(),
            "oauth_failed"
        );
        assert_eq!(
            LoginError::Provider("access_denied".to_string()).code(),
            "access_denied"
        );
    }

    #[test]
    fn test_redirect_location() {
        assert_eq!(
            LoginError::InvalidState.redirect_location(),
            "/?error=invalid_state"
        );
        assert_eq!(
            LoginError::Provider("access_denied".to_string()).redirect_location(),
            "/?error=access_denied"
        );
    }

    #[test]
    fn test_consumes_state() {
        assert!(!LoginError::NotConfigured.consumes_state());
        assert!(!LoginError::InvalidState.consumes_state());
        assert!(LoginError::Provider("access_denied".to_string()).consumes_state());
        assert!(LoginError::NoCode.consumes_state());
        assert!(LoginError::ExchangeFailed(anyhow::anyhow!("boom")).consumes_state());
    }

    #[test]
    fn test_provider_error_is_url_encoded() {
        let error = LoginError::Provider("bad thing&x=1".to_string());
        assert_eq!(error.redirect_location(), "/?error=bad%20thing%26x%3D1");
    }

    #[test]
    fn test_exchange_detail_stays_out_of_redirect() {
        let error = LoginError::ExchangeFailed(anyhow::anyhow!("client_secret=hunter2 rejected"));
        assert_eq!(error.redirect_location(), "/?error=oauth_failed");
        assert!(error.to_string().contains("hunter2"));
    }
}
