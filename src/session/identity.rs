use serde::{Deserialize, Serialize};

/// Signed-in user, as reported by the identity provider
///
/// Stored verbatim in the session token; there is no local user table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider subject identifier (`sub`)
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}
