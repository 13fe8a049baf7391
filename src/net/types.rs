//! Request payloads and canonical records shared by the auth adapter.
//!
//! DESIGN
//! ======
//! Replies from the backend are kept as `serde_json::Value` until the
//! normalizer has located them; only canonical shapes get typed structs.

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterPayload {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterPayload {
    /// Credentials for the login that follows a token-less registration.
    pub fn login_payload(&self) -> LoginPayload {
        LoginPayload { email: self.email.clone(), password: self.password.clone() }
    }
}

/// The canonical user, also the JSON shape persisted under `authUser`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Backend identifier, stringified. Falls back to the email.
    pub id: String,
    pub email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
}
