//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages never touch the session store directly: they submit through these
//! helpers, which keep the `AuthState` signal and durable storage in step,
//! and install the same unauthenticated redirect on every protected route.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::error::AuthError;
use crate::net::api::AuthBackend;
use crate::net::http::ApiClient;
use crate::net::types::{LoginPayload, RegisterPayload};
use crate::state::auth::AuthState;
use crate::state::route::{AppRoute, GuardDecision, guard};
use crate::state::session::SessionStore;
use crate::util::storage::{BrowserStorage, KeyValueStorage};

/// The store wired to the real backend and `localStorage`.
pub type BrowserSessionStore = SessionStore<ApiClient, BrowserStorage>;

/// Where `route` should send the user, if the current state is not admitted.
pub fn unauth_redirect(state: &AuthState, route: AppRoute) -> Option<AppRoute> {
    match guard(route, state.token()) {
        GuardDecision::Admit => None,
        GuardDecision::Redirect(target) => Some(target),
    }
}

/// Redirect to `/login` whenever the session disappears on a protected route.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, route: AppRoute, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let Some(target) = unauth_redirect(&auth.get(), route) {
            navigate(target.path(), NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}

/// Log in and commit the session into `auth`.
///
/// A disposed `auth` signal (the app was torn down mid-request) drops the
/// outcome silently.
///
/// # Errors
///
/// Returns the store's authentication or transport error for display.
pub async fn submit_login<B: AuthBackend, S: KeyValueStorage>(
    auth: RwSignal<AuthState>,
    store: &SessionStore<B, S>,
    payload: LoginPayload,
) -> Result<(), AuthError> {
    auth.try_update(|s| s.loading = true);
    let outcome = store.login(&payload).await;
    auth.try_update(|s| s.settle(&outcome));
    outcome.map(|_| ())
}

/// Register (logging in afterwards when needed) and commit the session.
///
/// # Errors
///
/// Returns the store's authentication or transport error for display.
pub async fn submit_register<B: AuthBackend, S: KeyValueStorage>(
    auth: RwSignal<AuthState>,
    store: &SessionStore<B, S>,
    payload: RegisterPayload,
) -> Result<(), AuthError> {
    auth.try_update(|s| s.loading = true);
    let outcome = store.register(&payload).await;
    auth.try_update(|s| s.settle(&outcome));
    outcome.map(|_| ())
}

/// Clear the persisted session and the in-memory state.
pub fn sign_out<B: AuthBackend, S: KeyValueStorage>(auth: RwSignal<AuthState>, store: &SessionStore<B, S>) {
    store.logout();
    auth.try_update(AuthState::clear);
}
