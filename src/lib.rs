//! # LogCentral
//!
//! Multi-tenant log aggregation backend. Developers record, read and archive
//! their own log entries; managers may act on anyone's.
//!
//! ## Architecture
//!
//! ```text
//! HTTP (axum) → bearer middleware → workflows → repositories (sqlx/SQLite)
//!                       ↓                ↓
//!                 TokenService     access policy, PasswordHasher
//! ```
//!
//! Every workflow takes the caller's [`auth::Identity`] explicitly and answers
//! with a [`domain::Response`] envelope whose `code` is the HTTP status.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use logcentral::{api, config, storage, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = config::load()?;
//!     let pool = storage::create_pool(&config.database).await?;
//!     let state = api::ApiState::from_pool(pool, &config.auth, Arc::new(mockable::DefaultClock))?;
//!     api::start_api_server(&config.server, state).await
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod services;
pub mod storage;

pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
