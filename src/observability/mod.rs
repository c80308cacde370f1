//! # Observability Infrastructure
//!
//! Structured logging through `tracing`. Per-request spans come from
//! `tower-http`'s `TraceLayer` in [`crate::api`].

pub mod logging;

pub use logging::{init_logging, log_config_info};
