//! Normalization of loosely-shaped login/register replies.
//!
//! SYSTEM CONTEXT
//! ==============
//! Backend versions disagree on where the user and token live: top level,
//! under `data`, or under `data.data`. Each field is located by walking an
//! ordered list of key paths and taking the first present value.
//! A new backend shape is one more entry in the relevant key-path list.
//!
//! Presence follows the backend's loose typing: `null`, `false`, `0` and the
//! empty string all count as absent.

#[cfg(test)]
#[path = "normalize_test.rs"]
mod normalize_test;

use serde_json::Value;

use crate::error::DEFAULT_LOGIN_FAILURE;
use crate::net::types::AuthUser;

/// Display name used when neither the reply nor the caller supplies one.
pub const DEFAULT_FULL_NAME: &str = "User";

/// A key path into a JSON document.
pub(crate) type KeyPath = &'static [&'static str];

const USER_PATHS: &[KeyPath] = &[&["user"], &["data", "user"], &["data", "data", "user"], &["data", "user_data"]];
const EMAIL_PATHS: &[KeyPath] = &[&["data", "email"], &["email"]];
const FULL_NAME_PATHS: &[KeyPath] = &[&["fullName"], &["data", "fullName"]];
const ID_PATHS: &[KeyPath] = &[&["userId"], &["user_id"], &["data", "userId"], &["data", "user_id"]];
const TOKEN_PATHS: &[KeyPath] = &[&["token"], &["data", "token"], &["data", "data", "token"]];

const STRING_LOGIN_FLAG: &str = "isLoggined";
const BOOL_LOGIN_FLAG: &str = "isLoggedIn";

/// Result of interpreting a login reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedLogin {
    pub is_logged_in: bool,
    pub token: Option<String>,
    pub user: AuthUser,
}

/// Extract the canonical user from any known reply shape.
///
/// Fields found on a nested user object win over root-level fields. Fallbacks
/// fill whatever is still missing; the id falls back to the resolved email.
pub fn extract_user(response: &Value, fallback_email: &str, fallback_full_name: &str) -> AuthUser {
    let user = USER_PATHS
        .iter()
        .filter_map(|path| lookup(response, path))
        .find(|v| v.is_object());
    let from_user = |field: &str| user.and_then(|u| u.get(field)).and_then(present_text);

    let email = from_user("email")
        .or_else(|| first_text(response, EMAIL_PATHS))
        .unwrap_or_else(|| fallback_email.to_owned());
    let full_name = from_user("fullName")
        .or_else(|| first_text(response, FULL_NAME_PATHS))
        .or_else(|| Some(fallback_full_name.to_owned()).filter(|name| !name.is_empty()))
        .unwrap_or_else(|| DEFAULT_FULL_NAME.to_owned());
    let id = from_user("id")
        .or_else(|| first_text(response, ID_PATHS))
        .unwrap_or_else(|| email.clone());

    AuthUser { id, email, full_name }
}

/// Extract the bearer token, if the reply carries one anywhere.
pub fn extract_token(response: &Value) -> Option<String> {
    first_text(response, TOKEN_PATHS)
}

/// Decide login success and canonicalize the user and token.
///
/// The legacy string flag (`"True"`/`"False"`, any case) and the boolean flag
/// are OR'd: either one affirming success is enough.
pub fn normalize_login_response(response: &Value, fallback_email: &str) -> NormalizedLogin {
    let string_flag = response
        .get(STRING_LOGIN_FLAG)
        .and_then(Value::as_str)
        .is_some_and(|flag| flag.eq_ignore_ascii_case("true"));
    let bool_flag = response.get(BOOL_LOGIN_FLAG).and_then(Value::as_bool) == Some(true);

    NormalizedLogin {
        is_logged_in: string_flag || bool_flag,
        token: extract_token(response),
        user: extract_user(response, fallback_email, DEFAULT_FULL_NAME),
    }
}

/// Whether the reply states a login outcome at all, successful or not.
pub fn has_login_flag(response: &Value) -> bool {
    response.get(STRING_LOGIN_FLAG).is_some() || response.get(BOOL_LOGIN_FLAG).is_some()
}

/// Backend-provided rejection message, or the generic credentials hint.
pub fn login_failure_message(response: &Value) -> String {
    response
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(DEFAULT_LOGIN_FAILURE)
        .to_owned()
}

pub(crate) fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, key| node.get(key))
}

fn first_text(value: &Value, paths: &[KeyPath]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| lookup(value, path))
        .find_map(present_text)
}

/// Text form of a present scalar; numeric ids are stringified.
fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
