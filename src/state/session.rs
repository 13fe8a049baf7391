//! Session store: login, register, logout, and restore across reloads.
//!
//! DESIGN
//! ======
//! The store owns the backend and durable storage; it hands committed
//! sessions back to the caller, which applies them to the shared
//! `AuthState` signal. A session is persisted into three independent slots
//! (`authToken`, `authUser`, `user_id`) and restored from the first two;
//! a partial record is wiped.
//!
//! ERROR HANDLING
//! ==============
//! Backend failures propagate unchanged. Storage failures and malformed
//! persisted records are logged and read as "logged out".

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::error::{AuthError, StorageError};
use crate::net::api::AuthBackend;
use crate::net::normalize::{extract_token, extract_user, login_failure_message, normalize_login_response};
use crate::net::types::{AuthUser, LoginPayload, RegisterPayload};
use crate::state::auth::AuthState;
use crate::util::storage::{self, AUTH_TOKEN_KEY, AUTH_USER_KEY, KeyValueStorage, USER_ID_KEY};

/// The canonical user plus the bearer token that gates protected routes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user: AuthUser,
    pub token: String,
}

#[derive(Clone, Debug)]
pub struct SessionStore<B, S> {
    backend: B,
    storage: S,
    clock: fn() -> u64,
}

impl<B: AuthBackend, S: KeyValueStorage> SessionStore<B, S> {
    pub fn new(backend: B, storage: S) -> Self {
        Self { backend, storage, clock: now_millis }
    }

    /// Replace the millisecond clock used for fabricated tokens.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Rebuild the in-memory state from durable storage.
    ///
    /// Both the user record and the token must be readable. A partial or
    /// malformed record restores a logged-out state and clears every slot.
    pub fn restore(&self) -> AuthState {
        let record = self.load_user();
        let token = storage::read(&self.storage, AUTH_TOKEN_KEY);
        match (record, token) {
            (Ok(Some(user)), Some(token)) => AuthState { user: Some(user), token: Some(token), loading: false },
            (Ok(None), None) => AuthState::default(),
            (record, _) => {
                if let Err(e) = record {
                    log::debug!("discarding persisted session: {e}");
                } else {
                    log::debug!("discarding partial persisted session");
                }
                self.clear_slots();
                AuthState::default()
            }
        }
    }

    /// Log in and persist the resulting session.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` when the backend does not affirm the
    /// login, or the transport error from the request.
    pub async fn login(&self, payload: &LoginPayload) -> Result<Session, AuthError> {
        let reply = self.backend.login(payload).await?;
        let normalized = normalize_login_response(&reply, &payload.email);
        if !normalized.is_logged_in {
            let message = login_failure_message(&reply);
            log::info!("login rejected for {}: {message}", payload.email);
            return Err(AuthError::AuthenticationFailed(message));
        }

        // Cookie-authenticated backends reply without a token; the route guard
        // still needs a non-empty value.
        let token = normalized
            .token
            .unwrap_or_else(|| fabricate_token(&normalized.user.email, (self.clock)()));
        let session = Session { user: normalized.user, token };
        self.persist(&session);
        log::info!("logged in as {}", session.user.email);
        Ok(session)
    }

    /// Register, then log in with the same credentials unless the
    /// registration reply already carries a token.
    ///
    /// # Errors
    ///
    /// Returns the register call's transport error, or any error from the
    /// follow-up login.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<Session, AuthError> {
        let reply = self.backend.register(payload).await?;
        match extract_token(&reply) {
            Some(token) => {
                let user = extract_user(&reply, &payload.email, &payload.full_name);
                let session = Session { user, token };
                self.persist(&session);
                log::info!("registered {}", session.user.email);
                Ok(session)
            }
            None => {
                log::debug!("register reply has no token; logging in as {}", payload.email);
                self.login(&payload.login_payload()).await
            }
        }
    }

    /// Clear all persisted session slots. Safe to call when logged out.
    pub fn logout(&self) {
        self.clear_slots();
        log::info!("logged out");
    }

    fn clear_slots(&self) {
        for key in [AUTH_TOKEN_KEY, AUTH_USER_KEY, USER_ID_KEY] {
            storage::remove(&self.storage, key);
        }
    }

    fn persist(&self, session: &Session) {
        storage::write(&self.storage, AUTH_TOKEN_KEY, &session.token);
        storage::save_json(&self.storage, AUTH_USER_KEY, &session.user);
        storage::write(&self.storage, USER_ID_KEY, &session.user.id);
    }

    fn load_user(&self) -> Result<Option<AuthUser>, StorageError> {
        let Some(raw) = self.storage.get_item(AUTH_USER_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::MalformedSession(e.to_string()))
    }
}

/// Stand-in token for a successful login that returned none.
pub fn fabricate_token(email: &str, now_ms: u64) -> String {
    format!("auth-{email}-{now_ms}")
}

/// Milliseconds since the Unix epoch.
#[cfg(feature = "csr")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

/// Milliseconds since the Unix epoch.
#[cfg(not(feature = "csr"))]
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
