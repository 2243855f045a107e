//! Auth Router
//!
//! Login and callback answer every outcome with a 302 redirect since the
//! browser is mid-navigation; `/me` and `/logout` are plain JSON endpoints.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::trace::TraceLayer;

use crate::session::{SESSION_COOKIE, STATE_COOKIE};

use super::extractor::AuthenticatedUser;
use super::handler::OAuthFlowHandler;
use super::types::{CallbackParams, LogoutResponse, MeResponse};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub handler: Arc<OAuthFlowHandler>,
}

/// Create the auth router
///
/// # Endpoints
/// - `GET /login/google` - Redirect to Google
/// - `GET /callback/google` - Google redirects back here
/// - `GET /me` - Current user
/// - `POST /logout` - Clear the session cookie
pub fn create_auth_router(handler: Arc<OAuthFlowHandler>) -> Router {
    let state = AuthState { handler };

    Router::new()
        .route("/login/google", get(handle_login))
        .route("/callback/google", get(handle_callback))
        .route("/me", get(handle_me))
        .route("/logout", post(handle_logout))
        .with_state(state)
}

/// Full application: auth routes under `/auth` with request tracing
pub fn create_app(handler: Arc<OAuthFlowHandler>) -> Router {
    Router::new()
        .nest("/auth", create_auth_router(handler))
        .layer(TraceLayer::new_for_http())
}

/// Handle login start (GET /auth/login/google)
async fn handle_login(
    State(state): State<AuthState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Response {
    match state.handler.begin_login(&headers) {
        Ok(login) => {
            let jar = jar.add(state.handler.cookies().state(login.state));
            (jar, found(login.authorization_url)).into_response()
        }
        Err(e) => found(e.redirect_location()),
    }
}

/// Handle provider callback (GET /auth/callback/google)
///
/// A query string that does not deserialize is treated as carrying no
/// parameters, so it still ends in a redirect.
async fn handle_callback(
    State(state): State<AuthState>,
    query: Result<Query<CallbackParams>, QueryRejection>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Response {
    let params = match query {
        Ok(Query(params)) => params,
        Err(e) => {
            tracing::warn!("Malformed callback query: {}", e);
            CallbackParams::default()
        }
    };
    let stored_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());

    match state
        .handler
        .complete_login(&params, stored_state.as_deref(), &headers)
        .await
    {
        Ok((token, _)) => {
            let cookies = state.handler.cookies();
            let jar = jar
                .add(cookies.session(token))
                .add(cookies.removal(STATE_COOKIE));
            (jar, found("/".to_string())).into_response()
        }
        Err(e) if e.consumes_state() => {
            let jar = jar.add(state.handler.cookies().removal(STATE_COOKIE));
            (jar, found(e.redirect_location())).into_response()
        }
        Err(e) => found(e.redirect_location()),
    }
}

/// Handle current user query (GET /auth/me)
async fn handle_me(AuthenticatedUser(identity): AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        authenticated: true,
        user: Some(identity),
    })
}

/// Handle logout (POST /auth/logout)
async fn handle_logout(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    let jar = jar.add(state.handler.cookies().removal(SESSION_COOKIE));
    (jar, Json(LogoutResponse { success: true }))
}

/// 302 Found
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
