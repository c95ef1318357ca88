//! Request and response shapes for `/auth/login` and `/auth/register`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::User;

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Username/password pair for the login endpoint.
///
/// The backend's token endpoint is OAuth2 password-flow compatible, so the
/// username is the account email and the pair is sent form-encoded.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Form fields in the order the token endpoint expects them.
    #[must_use]
    pub fn form_fields(&self) -> [(&str, &str); 2] {
        [
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ]
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /auth/register`.
///
/// Creates the account and either a new organization (`organization_name`)
/// or a membership in an existing one (`organization_id`).
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("organization_name", &self.organization_name)
            .field("organization_id", &self.organization_id)
            .finish()
    }
}

/// Credential issued by login or registration.
///
/// Backend versions disagree on where the user goes: some nest it under
/// `user`, registration in others returns the user's fields flattened next
/// to the token. Both decode into `user`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawAuthResponse")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: Option<User>,
}

#[derive(Deserialize)]
struct RawAuthResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    user: Option<User>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TryFrom<RawAuthResponse> for AuthResponse {
    type Error = serde_json::Error;

    fn try_from(raw: RawAuthResponse) -> Result<Self, Self::Error> {
        let user = match raw.user {
            Some(user) => Some(user),
            None if raw.rest.contains_key("id") && raw.rest.contains_key("email") => {
                Some(serde_json::from_value(Value::Object(raw.rest))?)
            }
            None => None,
        };
        Ok(Self {
            access_token: raw.access_token,
            token_type: raw.token_type,
            user,
        })
    }
}
