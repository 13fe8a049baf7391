//! Reusable UI components.

pub mod metrics_panel;
