//! # Structured Logging
//!
//! Subscriber setup for the `tracing` ecosystem. `RUST_LOG` wins over the
//! configured level when both are present.

use crate::config::{AppConfig, ObservabilityConfig};
use crate::errors::{Error, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Build the level filter for `config`.
pub fn env_filter(config: &ObservabilityConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            Error::config(format!("Invalid log level '{}': {}", config.log_level, e))
        }),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = env_filter(config)?;

    let fmt_layer = if config.json_logging {
        fmt::layer().json().with_current_span(true).with_span_list(false).boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::internal(format!("Failed to initialize logging: {}", e)))
}

/// Log configuration at startup
pub fn log_config_info(config: &AppConfig) {
    tracing::info!(
        server_address = %config.server.bind_address(),
        database_url = %config.database.url,
        auto_migrate = config.database.auto_migrate,
        token_ttl_seconds = config.auth.token_ttl_seconds,
        hash_iterations = config.auth.hash_iterations,
        json_logging = config.observability.json_logging,
        "logcentral configuration"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_directives() {
        let config = ObservabilityConfig {
            log_level: "logcentral=debug,tower_http=info".to_string(),
            json_logging: false,
        };
        assert!(env_filter(&config).is_ok());
    }

    #[test]
    fn test_log_config_info() {
        let config = AppConfig::default();

        // This should not panic
        log_config_info(&config);
    }
}
