//! Google OAuth login
//!
//! Authorization Code flow against Google:
//! - `GET /auth/login/google` redirects to Google with a fresh CSRF state
//! - `GET /auth/callback/google` verifies the state, exchanges the code,
//!   and sets the signed session cookie
//! - `GET /auth/me` reports the current session
//! - `POST /auth/logout` clears it

mod error;
mod extractor;
mod handler;
mod provider;
mod router;
mod types;

pub use handler::OAuthFlowHandler;
pub use router::create_app;
