//! Shared HTTP client for the speech backend.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Native builds: every call fails with a transport error since the
//! endpoints are only reachable from the browser.
//!
//! Every request reads the bearer token from `localStorage` at send time and
//! attaches `Authorization: Bearer <token>` when one is present. A storage
//! failure omits the header; it never fails the request. There is no retry,
//! timeout, or backoff: one call per invocation.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use serde::Serialize;
use serde_json::Value;

use crate::config::{self, ClientConfig};
use crate::error::TransportError;
#[cfg(feature = "csr")]
use crate::util::storage::{self, AUTH_TOKEN_KEY, BrowserStorage};

/// A received HTTP reply. `body` is `None` when it was not JSON.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Option<Value>,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The JSON body of a 2xx reply.
    ///
    /// # Errors
    ///
    /// Returns a transport error for non-2xx statuses or a non-JSON body.
    pub fn into_success(self) -> Result<Value, TransportError> {
        if !self.is_success() {
            return Err(TransportError(status_failed_message(self.status)));
        }
        self.body.ok_or_else(|| TransportError("reply body is not JSON".to_owned()))
    }
}

/// HTTP client bound to one base address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: config::sanitize_url(base_url) }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        config::join_url(&self.base_url, path)
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// Returns an error only if no reply was received.
    pub async fn get(&self, path: &str) -> Result<Reply, TransportError> {
        #[cfg(feature = "csr")]
        {
            let request = with_bearer(gloo_net::http::Request::get(&self.url(path)))
                .build()
                .map_err(transport)?;
            receive(request.send().await.map_err(transport)?).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = path;
            Err(unavailable())
        }
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be encoded or no reply was received.
    pub async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<Reply, TransportError> {
        #[cfg(feature = "csr")]
        {
            let request = with_bearer(gloo_net::http::Request::post(&self.url(path)))
                .json(body)
                .map_err(transport)?;
            receive(request.send().await.map_err(transport)?).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (path, body);
            Err(unavailable())
        }
    }

    /// `POST path` with a multipart form body (audio uploads).
    ///
    /// # Errors
    ///
    /// Returns an error if no reply was received.
    #[cfg(feature = "csr")]
    pub async fn post_form(&self, path: &str, form: web_sys::FormData) -> Result<Reply, TransportError> {
        let request = with_bearer(gloo_net::http::Request::post(&self.url(path)))
            .body(form)
            .map_err(transport)?;
        receive(request.send().await.map_err(transport)?).await
    }
}

/// Header value for a stored token; empty tokens produce no header.
pub fn bearer_header(token: Option<&str>) -> Option<String> {
    token.filter(|t| !t.is_empty()).map(|t| format!("Bearer {t}"))
}

pub(crate) fn status_failed_message(status: u16) -> String {
    format!("backend responded with status {status}")
}

#[cfg(feature = "csr")]
fn with_bearer(builder: gloo_net::http::RequestBuilder) -> gloo_net::http::RequestBuilder {
    let token = storage::read(&BrowserStorage::Local, AUTH_TOKEN_KEY);
    match bearer_header(token.as_deref()) {
        Some(value) => builder.header("Authorization", &value),
        None => builder,
    }
}

#[cfg(feature = "csr")]
async fn receive(resp: gloo_net::http::Response) -> Result<Reply, TransportError> {
    let status = resp.status();
    let body = resp.json::<Value>().await.ok();
    if !resp.ok() {
        log::warn!("{} -> {status}", resp.url());
    }
    Ok(Reply { status, body })
}

#[cfg(feature = "csr")]
fn transport(e: gloo_net::Error) -> TransportError {
    TransportError(e.to_string())
}

#[cfg(not(feature = "csr"))]
fn unavailable() -> TransportError {
    TransportError("not available outside the browser".to_owned())
}
