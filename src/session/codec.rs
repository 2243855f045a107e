//! Session token codec
//!
//! A token is `payload.timestamp.signature`:
//! - `payload`: base64url (no padding) JSON of the [`Identity`]
//! - `timestamp`: issue time, unix seconds
//! - `signature`: base64url HMAC-SHA256 over `payload.timestamp`
//!
//! The HMAC key is derived from the signing secret and a fixed salt, so the
//! same secret used elsewhere never produces interchangeable signatures.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::identity::Identity;

type HmacSha256 = Hmac<Sha256>;

const KEY_SALT: &[u8] = b"chatkit-auth.session-cookie";

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct SessionCodec {
    key: [u8; 32],
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec").finish_non_exhaustive()
    }
}

impl SessionCodec {
    pub fn new(secret: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(KEY_SALT);
        hasher.update(b"signer");
        hasher.update(secret.as_bytes());
        Self {
            key: hasher.finalize().into(),
        }
    }

    /// Encode an identity, stamped with the current time
    pub fn encode(&self, identity: &Identity) -> anyhow::Result<String> {
        self.encode_at(identity, Utc::now().timestamp())
    }

    /// Decode a token issued at most `max_age_secs` ago
    ///
    /// Every failure (malformed, bad signature, expired, issued in the
    /// future) yields `None`; callers only learn "no session".
    pub fn decode(&self, token: &str, max_age_secs: i64) -> Option<Identity> {
        self.decode_at(token, max_age_secs, Utc::now().timestamp())
    }

    pub fn encode_at(&self, identity: &Identity, issued_at: i64) -> anyhow::Result<String> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(identity)?);
        let signed = format!("{}.{}", payload, issued_at);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&signed).finalize().into_bytes());
        Ok(format!("{}.{}", signed, signature))
    }

    pub fn decode_at(&self, token: &str, max_age_secs: i64, now: i64) -> Option<Identity> {
        let (signed, signature) = token.rsplit_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        self.mac(signed).verify_slice(&signature).ok()?;

        let (payload, issued_at) = signed.split_once('.')?;
        let issued_at: i64 = issued_at.parse().ok()?;
        let age = now.checked_sub(issued_at)?;
        if !(0..=max_age_secs).contains(&age) {
            return None;
        }

        let payload = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&payload).ok()
    }

    fn mac(&self, message: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(message.as_bytes());
        mac
    }
}
