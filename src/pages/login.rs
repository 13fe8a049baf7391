//! Login page with email + password credentials.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::net::types::LoginPayload;
use crate::state::auth::AuthState;
use crate::state::route::AppRoute;
use crate::util::auth::BrowserSessionStore;

/// Per-field validation messages for the login form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginFormErrors {
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
}

/// Build the login payload, or the messages for every missing field.
pub fn validate_login_input(email: &str, password: &str) -> Result<LoginPayload, LoginFormErrors> {
    let email = email.trim();
    let errors = LoginFormErrors {
        email: email.is_empty().then_some("Email is required"),
        password: password.is_empty().then_some("Password is required"),
    };
    if errors == LoginFormErrors::default() {
        Ok(LoginPayload { email: email.to_owned(), password: password.to_owned() })
    } else {
        Err(errors)
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let store = expect_context::<BrowserSessionStore>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = RwSignal::new(LoginFormErrors::default());
    let info = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.get_untracked().loading {
            return;
        }
        let payload = match validate_login_input(&email.get_untracked(), &password.get_untracked()) {
            Ok(payload) => payload,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(LoginFormErrors::default());
        info.set(String::new());

        #[cfg(feature = "csr")]
        {
            let store = store.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match crate::util::auth::submit_login(auth, &store, payload).await {
                    Ok(()) => navigate(AppRoute::Dashboard.path(), NavigateOptions::default()),
                    Err(e) => {
                        info.try_set(format!("Login failed: {e}"));
                    }
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (payload, &store, &navigate);
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Welcome back!"</h1>
                <p class="auth-card__subtitle">
                    "Pick up your last speech exercise or start a new guided session."
                </p>
                <form class="auth-form" on:submit=on_submit>
                    <label class="auth-label">"Email"</label>
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="you@mua.org"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <Show when=move || errors.get().email.is_some()>
                        <p class="auth-error">{move || errors.get().email.unwrap_or_default()}</p>
                    </Show>
                    <label class="auth-label">"Password"</label>
                    <input
                        class="auth-input"
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <Show when=move || errors.get().password.is_some()>
                        <p class="auth-error">{move || errors.get().password.unwrap_or_default()}</p>
                    </Show>
                    <button class="auth-button" type="submit" disabled=move || auth.get().loading>
                        {move || if auth.get().loading { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <p class="auth-card__footer">
                    "New here? " <A href=AppRoute::Register.path()>"Create an account"</A>
                </p>
            </div>
        </div>
    }
}
