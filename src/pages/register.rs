//! Registration page. A successful registration lands on the dashboard
//! already signed in.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::net::types::RegisterPayload;
use crate::state::auth::AuthState;
use crate::state::route::AppRoute;
use crate::util::auth::BrowserSessionStore;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFormErrors {
    pub full_name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
    pub confirm_password: Option<&'static str>,
}

pub fn validate_register_input(form: &RegisterForm) -> Result<RegisterPayload, RegisterFormErrors> {
    let full_name = form.full_name.trim();
    let email = form.email.trim();
    let confirm_password = if form.confirm_password.is_empty() {
        Some("Please confirm your password")
    } else if !form.password.is_empty() && form.password != form.confirm_password {
        Some("Passwords do not match")
    } else {
        None
    };
    let errors = RegisterFormErrors {
        full_name: full_name.is_empty().then_some("Full name is required"),
        email: email.is_empty().then_some("Email is required"),
        password: form.password.is_empty().then_some("Password is required"),
        confirm_password,
    };
    if errors == RegisterFormErrors::default() {
        Ok(RegisterPayload { full_name: full_name.to_owned(), email: email.to_owned(), password: form.password.clone() })
    } else {
        Err(errors)
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let store = expect_context::<BrowserSessionStore>();
    let navigate = use_navigate();

    let form = RwSignal::new(RegisterForm::default());
    let errors = RwSignal::new(RegisterFormErrors::default());
    let info = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.get_untracked().loading {
            return;
        }
        let payload = match validate_register_input(&form.get_untracked()) {
            Ok(payload) => payload,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(RegisterFormErrors::default());
        info.set(String::new());

        #[cfg(feature = "csr")]
        {
            let store = store.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match crate::util::auth::submit_register(auth, &store, payload).await {
                    Ok(()) => navigate(AppRoute::Dashboard.path(), NavigateOptions::default()),
                    Err(e) => {
                        info.try_set(format!("Registration failed: {e}"));
                    }
                }
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (payload, &store, &navigate);
        }
    };

    let field = move |label: &'static str,
                      kind: &'static str,
                      get: fn(&RegisterForm) -> String,
                      set: fn(&mut RegisterForm, String),
                      error: fn(&RegisterFormErrors) -> Option<&'static str>| {
        view! {
            <label class="auth-label">{label}</label>
            <input
                class="auth-input"
                type=kind
                prop:value=move || get(&form.get())
                on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
            />
            <Show when=move || error(&errors.get()).is_some()>
                <p class="auth-error">{move || error(&errors.get()).unwrap_or_default()}</p>
            </Show>
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Create your learning account"</h1>
                <form class="auth-form" on:submit=on_submit>
                    {field("Full name", "text", |f| f.full_name.clone(), |f, v| f.full_name = v, |e| e.full_name)}
                    {field("Email", "email", |f| f.email.clone(), |f, v| f.email = v, |e| e.email)}
                    {field("Password", "password", |f| f.password.clone(), |f, v| f.password = v, |e| e.password)}
                    {field(
                        "Confirm password",
                        "password",
                        |f| f.confirm_password.clone(),
                        |f, v| f.confirm_password = v,
                        |e| e.confirm_password,
                    )}
                    <button class="auth-button" type="submit" disabled=move || auth.get().loading>
                        {move || if auth.get().loading { "Creating account..." } else { "Create account" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <p class="auth-card__footer">
                    "Already registered? " <A href=AppRoute::Login.path()>"Sign in"</A>
                </p>
            </div>
        </div>
    }
}
