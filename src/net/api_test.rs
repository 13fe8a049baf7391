use super::*;
use serde_json::json;

#[test]
fn accept_auth_reply_keeps_success_body() {
    let reply = Reply { status: 200, body: Some(json!({ "isLoggined": "True" })) };
    assert_eq!(accept_auth_reply(reply), Ok(json!({ "isLoggined": "True" })));
}

#[test]
fn accept_auth_reply_passes_flagged_rejection_through() {
    let body = json!({ "isLoggedIn": false, "message": "bad password" });
    let reply = Reply { status: 401, body: Some(body.clone()) };
    assert_eq!(accept_auth_reply(reply), Ok(body));
}

#[test]
fn accept_auth_reply_rejects_unflagged_error() {
    let reply = Reply { status: 500, body: Some(json!({ "message": "boom" })) };
    assert_eq!(
        accept_auth_reply(reply),
        Err(TransportError("backend responded with status 500".to_owned()))
    );
}

#[test]
fn accept_auth_reply_rejects_error_without_body() {
    let reply = Reply { status: 404, body: None };
    assert!(accept_auth_reply(reply).is_err());
}

#[cfg(not(feature = "csr"))]
#[test]
fn api_client_login_outside_browser_is_transport_failure() {
    let client = ApiClient::new("http://h");
    let payload = LoginPayload { email: "a@b.com".to_owned(), password: "pw".to_owned() };
    let err = futures::executor::block_on(AuthBackend::login(&client, &payload)).unwrap_err();
    assert!(matches!(err, AuthError::Transport(_)));
}
