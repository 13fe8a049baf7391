//! Route-level page components.

pub mod assessment;
pub mod dashboard;
pub mod login;
pub mod recommendations;
pub mod register;
