//! Error taxonomy for auth, transport, storage, and speech-analysis calls.
//!
//! ERROR HANDLING
//! ==============
//! Auth and transport errors surface to the form handler that issued the
//! request. Storage errors never surface: every call site logs them and treats
//! the value as absent.

/// Message shown when the backend rejects a login without explaining why.
pub const DEFAULT_LOGIN_FAILURE: &str = "Login failed. Please check your credentials.";

/// The request never produced a usable reply (network failure, non-2xx, bad body).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request failed: {0}")]
pub struct TransportError(pub String);

/// Errors produced by login and register.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The backend replied but did not affirm the login.
    #[error("{0}")]
    AuthenticationFailed(String),

    /// The backend could not be reached or replied with an unrecognized failure.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Errors produced by durable browser storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No storage area exists (storage disabled, sandboxed, or not a browser).
    #[error("storage unavailable")]
    Unavailable,

    /// The storage area exists but the access threw.
    #[error("storage access failed: {0}")]
    Access(String),

    /// The persisted `authUser` record does not parse as a user.
    #[error("persisted session is malformed: {0}")]
    MalformedSession(String),
}

/// Errors produced by assessment and practice uploads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    /// The backend replied with a status code other than `201 Created`.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
