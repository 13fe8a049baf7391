//! Auth endpoints and the backend seam used by the session store.
//!
//! ERROR HANDLING
//! ==============
//! A non-2xx reply that still states a login outcome is passed through so the
//! normalizer can surface the backend's own rejection message. Anything else
//! that is not a 2xx JSON body becomes a transport error.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::future::Future;

use serde_json::Value;

use super::http::{ApiClient, Reply, status_failed_message};
use super::normalize::has_login_flag;
use super::types::{LoginPayload, RegisterPayload};
use crate::error::{AuthError, TransportError};

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const REGISTER_ENDPOINT: &str = "/auth/register";

/// The two backend calls the session store depends on. Each returns the raw
/// reply for the normalizer.
pub trait AuthBackend {
    fn login(&self, payload: &LoginPayload) -> impl Future<Output = Result<Value, AuthError>>;

    fn register(&self, payload: &RegisterPayload) -> impl Future<Output = Result<Value, AuthError>>;
}

impl AuthBackend for ApiClient {
    async fn login(&self, payload: &LoginPayload) -> Result<Value, AuthError> {
        let reply = self.post_json(LOGIN_ENDPOINT, payload).await?;
        Ok(accept_auth_reply(reply)?)
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<Value, AuthError> {
        let reply = self.post_json(REGISTER_ENDPOINT, payload).await?;
        Ok(accept_auth_reply(reply)?)
    }
}

/// Keep 2xx JSON bodies and flagged error bodies; reject the rest.
pub(crate) fn accept_auth_reply(reply: Reply) -> Result<Value, TransportError> {
    if !reply.is_success() {
        return match reply.body {
            Some(body) if has_login_flag(&body) => Ok(body),
            _ => Err(TransportError(status_failed_message(reply.status))),
        };
    }
    reply.into_success()
}
