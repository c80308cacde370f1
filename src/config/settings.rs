//! # Configuration Settings
//!
//! Defines the configuration structure for the logcentral backend.

use crate::auth::hashing::MIN_ITERATIONS;
use crate::auth::token_service::DEFAULT_TTL_SECONDS;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;
use zeroize::Zeroizing;

/// Minimum accepted length of the token signing secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone, Validate, Default)]
pub struct AppConfig {
    /// Server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Database configuration
    #[validate(nested)]
    pub database: DatabaseConfig,

    /// Authentication configuration
    #[validate(nested)]
    pub auth: AuthConfig,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load every section from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            observability: ObservabilityConfig::from_env(),
        })
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        self.validate_custom()
    }

    fn validate_custom(&self) -> Result<()> {
        if !self.database.is_sqlite() {
            return Err(Error::validation("Database URL must start with 'sqlite:'"));
        }

        if self.auth.token_secret.len() < MIN_SECRET_LEN {
            return Err(Error::validation(format!(
                "Token secret must be at least {} characters long",
                MIN_SECRET_LEN
            )));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, message = "Port must be between 1 and 65535"))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8080 }
    }
}

impl ServerConfig {
    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let host = std::env::var("LOGCENTRAL_HOST").unwrap_or(defaults.host);
        let port = parse_env("LOGCENTRAL_PORT")?.unwrap_or(defaults.port);
        Ok(Self { host, port })
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[validate(length(min = 1, message = "Database URL cannot be empty"))]
    pub url: String,

    /// Maximum number of connections in the pool
    #[validate(range(min = 1, max = 100, message = "Max connections must be between 1 and 100"))]
    pub max_connections: u32,

    /// Connection timeout in seconds
    #[validate(range(min = 1, max = 60, message = "Connect timeout must be between 1 and 60 seconds"))]
    pub connect_timeout_seconds: u64,

    /// Enable automatic migrations
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/logcentral.db".to_string(),
            max_connections: 10,
            connect_timeout_seconds: 10,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Get connection timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Check if this is a SQLite configuration
    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }

    /// Create DatabaseConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let url = std::env::var("DATABASE_URL").unwrap_or(defaults.url);
        let max_connections =
            parse_env("DATABASE_MAX_CONNECTIONS")?.unwrap_or(defaults.max_connections);
        let connect_timeout_seconds = parse_env("DATABASE_CONNECT_TIMEOUT_SECONDS")?
            .unwrap_or(defaults.connect_timeout_seconds);
        let auto_migrate = std::env::var("DATABASE_AUTO_MIGRATE")
            .map(|s| parse_flag(&s))
            .unwrap_or(defaults.auto_migrate);

        Ok(Self { url, max_connections, connect_timeout_seconds, auto_migrate })
    }
}

/// Session token and password hashing configuration
#[derive(Clone, Validate)]
pub struct AuthConfig {
    /// HMAC secret for token signing/verification
    pub token_secret: Zeroizing<String>,

    /// Session token lifetime in seconds
    #[validate(range(min = 1, max = 604800, message = "Token TTL must be between 1 second and 7 days"))]
    pub token_ttl_seconds: u64,

    /// PBKDF2 iteration count
    #[validate(range(min = 10000, message = "Hash iterations must be at least 10000"))]
    pub hash_iterations: u32,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("hash_iterations", &self.hash_iterations)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: Zeroizing::new(String::new()),
            token_ttl_seconds: DEFAULT_TTL_SECONDS,
            hash_iterations: MIN_ITERATIONS,
        }
    }
}

impl AuthConfig {
    /// Build from an explicit secret with default lifetimes.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self { token_secret: Zeroizing::new(secret.into()), ..Self::default() }
    }

    /// The signing secret is mandatory; there is no built-in fallback.
    pub fn from_env() -> Result<Self> {
        let token_secret = std::env::var("LOGCENTRAL_TOKEN_SECRET")
            .map(Zeroizing::new)
            .map_err(|_| Error::config("LOGCENTRAL_TOKEN_SECRET environment variable not set"))?;
        let token_ttl_seconds =
            parse_env("LOGCENTRAL_TOKEN_TTL_SECONDS")?.unwrap_or(DEFAULT_TTL_SECONDS);
        let hash_iterations = parse_env("LOGCENTRAL_HASH_ITERATIONS")?.unwrap_or(MIN_ITERATIONS);

        Ok(Self { token_secret, token_ttl_seconds, hash_iterations })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logging: false }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            json_logging: std::env::var("LOG_JSON")
                .map(|s| parse_flag(&s))
                .unwrap_or(defaults.json_logging),
        }
    }
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::config(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

fn parse_flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true") || raw == "1"
}
