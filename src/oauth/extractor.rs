//! Session extractor for handlers that require a signed-in user

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::session::{Identity, SESSION_COOKIE};

use super::router::AuthState;
use super::types::MeResponse;

/// Identity decoded from a valid session cookie
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

/// Rejection for requests without a valid session
///
/// Absent, malformed, forged and expired cookies all land here alike.
#[derive(Debug)]
pub struct Unauthenticated;

impl IntoResponse for Unauthenticated {
    fn into_response(self) -> Response {
        let body = MeResponse {
            authenticated: false,
            user: None,
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Unauthenticated;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AuthState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).map(|c| c.value());

        state
            .handler
            .current_user(token)
            .map(AuthenticatedUser)
            .ok_or(Unauthenticated)
    }
}
