//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::config::ClientConfig;
use crate::net::http::ApiClient;
use crate::net::speech::SpeechApi;
use crate::pages::{
    assessment::AssessmentPage, dashboard::DashboardPage, login::LoginPage, recommendations::RecommendationsPage,
    register::RegisterPage,
};
use crate::state::assessment::AssessmentState;
use crate::state::route::AppRoute;
use crate::util::auth::BrowserSessionStore;
use crate::util::storage::BrowserStorage;

/// Root application component.
///
/// Restores the persisted session before the first route renders, so a
/// reload on a protected page keeps the user signed in.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_env();
    let store = BrowserSessionStore::new(ApiClient::from_config(&config), BrowserStorage::Local);
    let auth = RwSignal::new(store.restore());
    let assessment = RwSignal::new(AssessmentState::default());
    log::debug!("session restored: authenticated={}", auth.get_untracked().is_authenticated());

    provide_context(auth);
    provide_context(assessment);
    provide_context(SpeechApi::from_config(&config));
    provide_context(store);
    provide_context(config);

    view! {
        <Title text="Speech Therapy"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=|| view! { <Redirect path=AppRoute::Login.path()/> }/>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <Route path=StaticSegment("dashboard") view=DashboardPage/>
                <Route path=StaticSegment("assessment") view=AssessmentPage/>
                <Route path=StaticSegment("recommendations") view=RecommendationsPage/>
            </Routes>
        </Router>
    }
}
