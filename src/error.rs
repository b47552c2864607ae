//! Huginn error types

use std::time::Duration;

/// Huginn error types
///
/// Only network and malformed-response errors cross the fetch boundary.
/// Cache failures are a separate type ([`CacheError`](crate::cache::CacheError))
/// and are absorbed inside [`DataSource`](crate::DataSource).
#[derive(Debug, thiserror::Error)]
pub enum HuginnError {
    // Network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("server error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    // Data errors
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HuginnError {
    /// Shorthand for a [`HuginnError::MalformedResponse`].
    pub fn malformed(msg: impl Into<String>) -> Self {
        HuginnError::MalformedResponse(msg.into())
    }

    /// Whether this is a transport-level failure.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            HuginnError::Http(_) | HuginnError::Api { .. } | HuginnError::RateLimited { .. }
        )
    }

    /// Whether the payload could not be decoded.
    pub fn is_malformed(&self) -> bool {
        matches!(self, HuginnError::MalformedResponse(_))
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Connection failures, rate limiting and 5xx responses are transient.
    /// Client errors, decode failures and configuration problems are not.
    pub fn is_transient(&self) -> bool {
        match self {
            HuginnError::Http(_) | HuginnError::RateLimited { .. } => true,
            HuginnError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Server-provided retry hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            HuginnError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, HuginnError>;
