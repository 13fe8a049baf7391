//! Networking modules for the speech backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` is the shared bearer-aware client, `normalize` canonicalizes auth
//! replies, `api` exposes the auth endpoints, `speech` the assessment and
//! practice endpoints, and `types` the canonical records.

pub mod api;
pub mod http;
pub mod normalize;
pub mod speech;
pub mod types;
