//! Client configuration resolved from build-time environment variables.
//!
//! The WASM bundle has no process environment at runtime, so values are
//! captured with `option_env!` when the crate is compiled.
//!
//! Optional:
//! - `SPEECH_API_BASE_URL`: backend base address (dev default `http://127.0.0.1:5000`)
//! - `SPEECH_ASSESSMENT_BASE_URL`: audio upload base address (defaults to the API base)
//! - `SPEECH_LOG_LEVEL`: `error`..`trace` (dev default `debug`, release default `info`)

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_DEV_API_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub assessment_base_url: String,
    pub log_level: log::Level,
}

impl ClientConfig {
    /// Build config from the variables captured at compile time.
    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("SPEECH_API_BASE_URL"),
            option_env!("SPEECH_ASSESSMENT_BASE_URL"),
            option_env!("SPEECH_LOG_LEVEL"),
            cfg!(debug_assertions),
        )
    }

    /// Resolve config from raw values. Empty strings count as unset.
    pub fn from_values(api: Option<&str>, assessment: Option<&str>, level: Option<&str>, dev: bool) -> Self {
        let dev_default = if dev { Some(DEFAULT_DEV_API_BASE_URL) } else { None };
        let api_base_url = sanitize_url(non_empty(api).or(dev_default).unwrap_or_default());
        let assessment_base_url = match non_empty(assessment) {
            Some(raw) => sanitize_url(raw),
            None => api_base_url.clone(),
        };
        let log_level = parse_log_level(level, dev);

        Self { api_base_url, assessment_base_url, log_level }
    }
}

/// Strip trailing slashes so paths can be appended with a single `/`.
pub fn sanitize_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.filter(|v| !v.trim().is_empty())
}

fn parse_log_level(raw: Option<&str>, dev: bool) -> log::Level {
    non_empty(raw)
        .and_then(|v| v.trim().parse::<log::Level>().ok())
        .unwrap_or(if dev { log::Level::Debug } else { log::Level::Info })
}
