//! # Error Handling
//!
//! Error types for the logcentral backend, built with `thiserror`.
//!
//! Lower layers (storage, hashing, token signing, configuration) return
//! [`Error`]. Workflows never let it escape: every public workflow operation
//! catches it at its boundary and folds it into a
//! [`Response`](crate::domain::Response) envelope.

/// Custom result type for logcentral operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the logcentral backend
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database and storage errors
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: sqlx::Error,
        context: String,
    },

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Referenced entity does not exist
    #[error("{resource_type} with ID '{id}' not found")]
    NotFound { resource_type: String, id: String },

    /// A uniqueness constraint rejected the write
    #[error("{0}")]
    Conflict(String),

    /// Session token could not be produced
    #[error("Token error: {0}")]
    Token(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: ToString>(resource_type: R, id: I) -> Self {
        Self::NotFound { resource_type: resource_type.into(), id: id.to_string() }
    }

    /// Create a conflict error
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Wrap a sqlx error with context
    pub fn database<S: Into<String>>(source: sqlx::Error, context: S) -> Self {
        Self::Database { source, context: context.into() }
    }

    /// Status code reported to clients when this error reaches a workflow boundary.
    ///
    /// An absent entity and a uniqueness conflict are distinguished; every
    /// other failure is a generic client error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::Conflict(_) => 409,
            _ => 400,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(error: sqlx::Error) -> Self {
        Self::Database { source: error, context: "Database operation failed".to_string() }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = Error::config("missing secret");
        assert!(matches!(error, Error::Config(_)));
        assert_eq!(error.to_string(), "Configuration error: missing secret");
    }

    #[test]
    fn test_not_found_message() {
        let error = Error::not_found("Log", 42);
        assert_eq!(error.to_string(), "Log with ID '42' not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::not_found("User", 1).status_code(), 404);
        assert_eq!(Error::conflict("taken").status_code(), 409);
        assert_eq!(Error::validation("bad").status_code(), 400);
        assert_eq!(Error::internal("boom").status_code(), 400);
        assert_eq!(Error::database(sqlx::Error::RowNotFound, "fetch").status_code(), 400);
    }

    #[test]
    fn test_sqlx_conversion() {
        let error: Error = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(error, Error::Database { .. }));
    }
}
