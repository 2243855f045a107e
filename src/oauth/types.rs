//! OAuth login types

use serde::{Deserialize, Serialize};

use crate::session::Identity;

/// Query string the provider sends back to the callback
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub state: Option<String>,
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
}

/// OpenID Connect userinfo response
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl From<UserInfo> for Identity {
    fn from(info: UserInfo) -> Self {
        Identity {
            id: info.sub,
            email: info.email,
            name: info.name,
            picture: info.picture,
        }
    }
}

/// Where to send the browser to start a login, and the state it must echo
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    pub authorization_url: String,
    pub state: String,
}

/// `GET /auth/me` body
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
}

/// `POST /auth/logout` body
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}
