//! Error types for the fee monitor
//!
//! One enum for the whole crate. Retry exhaustion, empty node replies and
//! page-cap overruns each get their own variant so callers can match on
//! them; everything else wraps the underlying library error.

use crate::http::AttemptFailure;
use thiserror::Error;

/// The main error type for the fee monitor
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The retry budget ran out. `last` is the failure of the final attempt.
    #[error("HTTP request failed after {attempts} attempts (reqid={request_id}): {last}")]
    HttpFailed {
        request_id: u32,
        attempts: u32,
        last: AttemptFailure,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Remote Data Errors
    // ============================================================================
    #[error("No return data")]
    NoReturn,

    #[error("Query failed")]
    QueryFailed,

    #[error("Pagination stopped after {max_pages} pages with a non-empty cursor")]
    PaginationExceeded { max_pages: u32 },

    #[error("Missing field '{path}' in response")]
    MissingField { path: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Unsupported chain: {chain}")]
    UnsupportedChain { chain: String },

    // ============================================================================
    // Storage / Delivery Errors
    // ============================================================================
    #[error("Storage error: {0}")]
    Storage(#[from] duckdb::Error),

    #[error("Notification failed: {message}")]
    Notify { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an unsupported chain error
    pub fn unsupported_chain(chain: impl Into<String>) -> Self {
        Self::UnsupportedChain {
            chain: chain.into(),
        }
    }

    /// Create a notification error
    pub fn notify(message: impl Into<String>) -> Self {
        Self::Notify {
            message: message.into(),
        }
    }

    /// Whether this is the terminal retry-exhaustion error
    pub fn is_http_failed(&self) -> bool {
        matches!(self, Self::HttpFailed { .. })
    }

    /// Failure of the last attempt, when the retry budget ran out
    pub fn last_attempt(&self) -> Option<&AttemptFailure> {
        match self {
            Self::HttpFailed { last, .. } => Some(last),
            _ => None,
        }
    }
}

/// Result type alias for the fee monitor
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("result.ProposeGasPrice");
        assert_eq!(
            err.to_string(),
            "Missing field 'result.ProposeGasPrice' in response"
        );

        let err = Error::PaginationExceeded { max_pages: 10 };
        assert_eq!(
            err.to_string(),
            "Pagination stopped after 10 pages with a non-empty cursor"
        );
    }

    #[test]
    fn test_http_failed_keeps_last_attempt() {
        let err = Error::HttpFailed {
            request_id: 42,
            attempts: 3,
            last: AttemptFailure::BadStatus { status: 503 },
        };

        assert!(err.is_http_failed());
        assert_eq!(
            err.last_attempt(),
            Some(&AttemptFailure::BadStatus { status: 503 })
        );
        assert_eq!(
            err.to_string(),
            "HTTP request failed after 3 attempts (reqid=42): invalid status code 503"
        );
    }

    #[test]
    fn test_last_attempt_absent_for_other_errors() {
        assert!(!Error::NoReturn.is_http_failed());
        assert!(Error::QueryFailed.last_attempt().is_none());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
