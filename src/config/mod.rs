//! # Configuration Management
//!
//! Configuration is read once at startup into an explicit [`AppConfig`] and
//! passed by value to whatever needs it. `.env` files are honoured.

pub mod settings;

pub use settings::{AppConfig, AuthConfig, DatabaseConfig, ObservabilityConfig, ServerConfig};

use crate::errors::Result;

/// Load `.env` (if present), read the environment and validate the result.
pub fn load() -> Result<AppConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env file");
    }

    let config = AppConfig::from_env()?;
    config.validate()?;
    Ok(config)
}
