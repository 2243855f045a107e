//! Cookie attributes for the session and OAuth state cookies

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

pub const SESSION_COOKIE: &str = "chatkit_auth";
pub const STATE_COOKIE: &str = "oauth_state";

/// 7 days
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;
/// 10 minutes
pub const STATE_MAX_AGE_SECS: i64 = 600;

/// Shared attributes: http-only, same-site=lax, path `/`, secure in production
#[derive(Debug, Clone, Copy, Default)]
pub struct CookiePolicy {
    pub secure: bool,
}

impl CookiePolicy {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    pub fn session(&self, token: String) -> Cookie<'static> {
        self.build(SESSION_COOKIE, token, SESSION_MAX_AGE_SECS)
    }

    pub fn state(&self, state: String) -> Cookie<'static> {
        self.build(STATE_COOKIE, state, STATE_MAX_AGE_SECS)
    }

    /// A cookie that tells the browser to drop `name`
    pub fn removal(&self, name: &'static str) -> Cookie<'static> {
        let mut cookie = self.build(name, String::new(), 0);
        cookie.make_removal();
        cookie
    }

    fn build(&self, name: &'static str, value: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path("/")
            .max_age(Duration::seconds(max_age_secs))
            .build()
    }
}
