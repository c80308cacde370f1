//! # Repository Implementations
//!
//! `async_trait` repository traits with their sqlx-backed implementations.

pub mod log;
pub mod user;

pub use log::{LogRepository, SqlxLogRepository};
pub use user::{SqlxUserRepository, UserRepository};
