//! Dashboard page: greeting, logout, and the entry into an assessment.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. Losing the session while it is
//! mounted (logout, or another tab clearing storage on reload) sends the user
//! back to `/login`.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthState;
use crate::state::route::AppRoute;
use crate::util::auth::{BrowserSessionStore, install_unauth_redirect, sign_out};

/// Uppercased first character of the user's name, `'U'` when there is none.
pub fn avatar_initial(full_name: Option<&str>) -> char {
    full_name
        .and_then(|name| name.trim().chars().next())
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('U')
}

pub fn welcome_line(full_name: Option<&str>) -> String {
    match full_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("Welcome back, {name}!"),
        None => "Welcome back!".to_owned(),
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let store = expect_context::<BrowserSessionStore>();
    let navigate = use_navigate();

    install_unauth_redirect(auth, AppRoute::Dashboard, navigate.clone());

    let full_name = move || auth.get().user.map(|u| u.full_name);
    let email = move || auth.get().user.map(|u| u.email).unwrap_or_default();

    let navigate_logout = navigate.clone();
    let on_logout = move |_| {
        sign_out(auth, &store);
        navigate_logout(AppRoute::Login.path(), NavigateOptions::default());
    };
    let on_start = move |_| navigate(AppRoute::Assessment.path(), NavigateOptions::default());

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <span class="dashboard-page__avatar">
                    {move || avatar_initial(full_name().as_deref()).to_string()}
                </span>
                <div class="dashboard-page__identity">
                    <h1>{move || welcome_line(full_name().as_deref())}</h1>
                    <p class="dashboard-page__email">{email}</p>
                </div>
                <button class="dashboard-page__logout" on:click=on_logout>
                    "Log out"
                </button>
            </header>
            <section class="dashboard-page__hero">
                <h2>"Ready for today's session?"</h2>
                <p>"Read one sentence aloud and we will tailor your practice to the sounds that need work."</p>
                <button class="dashboard-page__start" on:click=on_start>
                    "Start assessment"
                </button>
            </section>
        </div>
    }
}
