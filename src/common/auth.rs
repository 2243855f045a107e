//! Common authentication utility functions

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use http::HeaderMap;
use rand::RngCore;
use subtle::ConstantTimeEq;

/// Constant-time string comparison to prevent timing attacks
///
/// The comparison time is constant regardless of string content,
/// which prevents attackers from guessing the value by measuring response time.
///
/// Uses the security-audited `subtle` crate implementation
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Generate a URL-safe random token from `len` bytes of OS-seeded randomness
pub fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Derive the externally visible base URL of this service
///
/// Reverse proxies report the original scheme and host through
/// `x-forwarded-proto` / `x-forwarded-host`. Without them the scheme is
/// `http` and the host comes from the `Host` header (or `localhost`).
pub fn base_url(headers: &HeaderMap) -> String {
    let proto = header_value(headers, "x-forwarded-proto").unwrap_or("http");
    let host = header_value(headers, "x-forwarded-host")
        .or_else(|| header_value(headers, "host"))
        .unwrap_or("localhost");
    format!("{}://{}", proto, host)
}

/// First non-empty entry of a (possibly comma-separated) header
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
