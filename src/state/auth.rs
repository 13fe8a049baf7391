//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `RwSignal<AuthState>` is provided through context by `App`. Route
//! guards and pages subscribe to it; only `util::auth` mutates it.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::error::AuthError;
use crate::net::types::AuthUser;
use crate::state::session::Session;

/// In-memory session plus the loading flag shown by the auth forms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub token: Option<String>,
    pub loading: bool,
}

impl AuthState {
    pub fn commit(&mut self, session: Session) {
        self.user = Some(session.user);
        self.token = Some(session.token);
    }

    pub fn clear(&mut self) {
        self.user = None;
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// A token is what the route guard checks; its validity is never verified here.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Apply the outcome of a login or register attempt.
    pub fn settle(&mut self, outcome: &Result<Session, AuthError>) {
        self.loading = false;
        if let Ok(session) = outcome {
            self.commit(session.clone());
        }
    }
}
