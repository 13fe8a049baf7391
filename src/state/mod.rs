//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `auth` is the in-memory session every view subscribes to, `session` the
//! store that creates and persists it, and `route` the guard built on it.
//! `assessment` carries the latest analysis over to the recommendation page.

pub mod assessment;
pub mod auth;
pub mod route;
pub mod session;
