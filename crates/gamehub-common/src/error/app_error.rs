//! Application error types
//!
//! Errors raised while assembling and running the application, plus the HTTP status
//! mapping shared by the service and API layers.

use gamehub_core::DomainError;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Config(_) | Self::Server(_) => 500,
            Self::Store(_) => 503,
            Self::Domain(e) => domain_status(e),
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Server(_) => "INTERNAL_ERROR",
            Self::Store(_) => "STORE_UNAVAILABLE",
            Self::Domain(e) => e.code(),
        }
    }
}

/// HTTP status for a domain error.
///
/// An exhausted transaction is a 409 the client may retry; an unreachable store is a 503.
#[must_use]
pub fn domain_status(err: &DomainError) -> u16 {
    if err.is_not_found() {
        404
    } else if err.is_authorization() {
        403
    } else if err.is_validation() {
        400
    } else if err.is_conflict() {
        409
    } else if err.is_transport() {
        503
    } else {
        500
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
