//! Business logic services
//!
//! Log entry workflows, separated from HTTP concerns. Account and login
//! workflows live under [`crate::auth`].

pub mod log_service;
pub mod validation;

pub use log_service::LogService;
pub use validation::{CreateLogRequest, UpdateLogRequest};
