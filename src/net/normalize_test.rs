use super::*;
use serde_json::json;

fn canonical() -> AuthUser {
    AuthUser { id: "42".to_owned(), email: "a@b.com".to_owned(), full_name: "Ada".to_owned() }
}

// =============================================================
// extract_user
// =============================================================

#[test]
fn extract_user_same_fields_across_nesting_levels() {
    let user = json!({ "id": 42, "email": "a@b.com", "fullName": "Ada" });
    let shapes = [
        json!({ "user": user }),
        json!({ "data": { "user": user } }),
        json!({ "data": { "data": { "user": user } } }),
        json!({ "data": { "user_data": user } }),
    ];
    for shape in &shapes {
        assert_eq!(extract_user(shape, "fallback@x.com", "Fallback"), canonical(), "shape: {shape}");
    }
}

#[test]
fn extract_user_reads_root_level_fields_without_user_object() {
    let reply = json!({ "email": "a@b.com", "fullName": "Ada", "userId": 42 });
    assert_eq!(extract_user(&reply, "x@y.com", "X"), canonical());
}

#[test]
fn extract_user_prefers_nested_user_over_root() {
    let reply = json!({ "email": "root@b.com", "user": { "email": "a@b.com", "fullName": "Ada", "id": "42" } });
    assert_eq!(extract_user(&reply, "", "").email, "a@b.com");
}

#[test]
fn extract_user_prefers_data_email_over_root_email() {
    let reply = json!({ "email": "root@b.com", "data": { "email": "data@b.com" } });
    assert_eq!(extract_user(&reply, "", "").email, "data@b.com");
}

#[test]
fn extract_user_checks_id_variants_in_order() {
    let reply = json!({ "user_id": "u-1", "data": { "userId": "u-2" } });
    assert_eq!(extract_user(&reply, "a@b.com", "A").id, "u-1");
    let nested = json!({ "data": { "user_id": 9 } });
    assert_eq!(extract_user(&nested, "a@b.com", "A").id, "9");
}

#[test]
fn extract_user_applies_fallbacks_and_email_as_id() {
    let user = extract_user(&json!({ "message": "created" }), "c@d.com", "Cee");
    assert_eq!(user, AuthUser { id: "c@d.com".to_owned(), email: "c@d.com".to_owned(), full_name: "Cee".to_owned() });
}

#[test]
fn extract_user_empty_name_fallback_uses_placeholder() {
    let user = extract_user(&json!({}), "c@d.com", "");
    assert_eq!(user.full_name, DEFAULT_FULL_NAME);
}

#[test]
fn extract_user_treats_empty_and_null_fields_as_absent() {
    let reply = json!({ "user": { "email": "", "fullName": null, "id": 0 } });
    let user = extract_user(&reply, "f@b.com", "F");
    assert_eq!(user.email, "f@b.com");
    assert_eq!(user.full_name, "F");
    assert_eq!(user.id, "f@b.com");
}

// =============================================================
// extract_token
// =============================================================

#[test]
fn extract_token_checks_keys_in_order() {
    assert_eq!(extract_token(&json!({ "token": "t0", "data": { "token": "t1" } })), Some("t0".to_owned()));
    assert_eq!(extract_token(&json!({ "data": { "token": "t1" } })), Some("t1".to_owned()));
    assert_eq!(extract_token(&json!({ "data": { "data": { "token": "t2" } } })), Some("t2".to_owned()));
}

#[test]
fn extract_token_skips_empty_values() {
    assert_eq!(extract_token(&json!({ "token": "", "data": { "token": "t1" } })), Some("t1".to_owned()));
    assert_eq!(extract_token(&json!({ "token": null })), None);
    assert_eq!(extract_token(&json!({})), None);
}

// =============================================================
// normalize_login_response
// =============================================================

#[test]
fn login_string_flag_true_any_case() {
    for flag in ["True", "true", "TRUE", "tRuE"] {
        let reply = json!({ "isLoggined": flag });
        assert!(normalize_login_response(&reply, "a@b.com").is_logged_in, "flag: {flag}");
    }
}

#[test]
fn login_bool_flag_true() {
    assert!(normalize_login_response(&json!({ "isLoggedIn": true }), "a@b.com").is_logged_in);
}

#[test]
fn login_flags_are_ored() {
    let reply = json!({ "isLoggined": "False", "isLoggedIn": true });
    assert!(normalize_login_response(&reply, "a@b.com").is_logged_in);
    let reply = json!({ "isLoggined": "True", "isLoggedIn": false });
    assert!(normalize_login_response(&reply, "a@b.com").is_logged_in);
}

#[test]
fn login_false_when_flags_deny_or_missing() {
    assert!(!normalize_login_response(&json!({ "isLoggined": "False" }), "a@b.com").is_logged_in);
    assert!(!normalize_login_response(&json!({ "isLoggined": "False", "isLoggedIn": false }), "a@b.com").is_logged_in);
    assert!(!normalize_login_response(&json!({ "token": "t" }), "a@b.com").is_logged_in);
}

#[test]
fn login_string_reply_becomes_canonical_session() {
    let reply = json!({ "email": "a@b.com", "fullName": "A", "isLoggined": "True", "token": "tok1" });
    let normalized = normalize_login_response(&reply, "typed@b.com");
    assert!(normalized.is_logged_in);
    assert_eq!(normalized.token.as_deref(), Some("tok1"));
    assert_eq!(
        normalized.user,
        AuthUser { id: "a@b.com".to_owned(), email: "a@b.com".to_owned(), full_name: "A".to_owned() }
    );
}

#[test]
fn login_without_name_uses_placeholder_and_submitted_email() {
    let normalized = normalize_login_response(&json!({ "isLoggedIn": true }), "typed@b.com");
    assert_eq!(normalized.user.email, "typed@b.com");
    assert_eq!(normalized.user.full_name, "User");
    assert_eq!(normalized.user.id, "typed@b.com");
}

// =============================================================
// flags + messages
// =============================================================

#[test]
fn has_login_flag_detects_either_key() {
    assert!(has_login_flag(&json!({ "isLoggedIn": false })));
    assert!(has_login_flag(&json!({ "isLoggined": "False" })));
    assert!(!has_login_flag(&json!({ "message": "nope" })));
}

#[test]
fn login_failure_message_prefers_backend_message() {
    assert_eq!(login_failure_message(&json!({ "message": "bad password" })), "bad password");
    assert_eq!(login_failure_message(&json!({ "message": "  " })), DEFAULT_LOGIN_FAILURE);
    assert_eq!(login_failure_message(&json!({})), DEFAULT_LOGIN_FAILURE);
}
