//! # speech-client
//!
//! Leptos + WASM frontend for the speech therapy platform.
//!
//! This crate contains the auth session adapter (response normalization,
//! persisted session, route guard), the REST client for the speech backend,
//! and the route-level pages that consume them. Browser-only code is gated
//! behind the `csr` feature so the session logic builds and tests natively.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: installs logging and mounts the root component.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let config = config::ClientConfig::from_env();
    let _ = console_log::init_with_level(config.log_level);
    if config.api_base_url.is_empty() {
        log::warn!("SPEECH_API_BASE_URL is not set; requests go to the page origin");
    }
    leptos::mount::mount_to_body(app::App);
}
