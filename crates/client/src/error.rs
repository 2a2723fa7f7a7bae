//! Client error types

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The per-request timeout elapsed and the transport was aborted
    #[error("Request timeout: {url}")]
    Timeout {
        /// URL of the timed-out request
        url: String,
    },

    /// Bad request
    #[error("Bad request: {message}")]
    BadRequest {
        /// Message extracted from the response body
        message: String,
        /// Parsed response body, when the server sent JSON
        data: Option<Value>,
    },

    /// Authentication failed; the stored token and session were cleared
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Message extracted from the response body
        message: String,
        /// Parsed response body, when the server sent JSON
        data: Option<Value>,
    },

    /// Forbidden; the stored token and session were cleared
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Message extracted from the response body
        message: String,
        /// Parsed response body, when the server sent JSON
        data: Option<Value>,
    },

    /// Resource not found
    #[error("Resource not found: {message}")]
    NotFound {
        /// Message extracted from the response body
        message: String,
        /// Parsed response body, when the server sent JSON
        data: Option<Value>,
    },

    /// Server returned another non-2xx status
    #[error("Server error {status}: {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
        /// Parsed response body, when the server sent JSON
        data: Option<Value>,
    },

    /// Absolute request URL whose origin differs from the configured base
    #[error("Request host does not match configured base {base}: {url}")]
    HostMismatch {
        /// The rejected absolute URL
        url: String,
        /// The configured base URL
        base: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Every fallback candidate for an operation failed
    #[error("All {operation} variants failed after {attempts} attempts: {last_error}")]
    CandidatesExhausted {
        /// Operation the probing was performed for
        operation: &'static str,
        /// Number of candidates attempted
        attempts: usize,
        /// Error reported by the final candidate
        last_error: String,
    },
}

impl ClientError {
    /// Create error from HTTP status code and parsed body
    #[must_use]
    pub fn from_status(status: StatusCode, message: String, data: Option<Value>) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest { message, data },
            401 => Self::AuthenticationFailed { message, data },
            403 => Self::Forbidden { message, data },
            404 => Self::NotFound { message, data },
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
                data,
            },
        }
    }

    /// Map a transport error, distinguishing timeouts from other failures
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: err.url().map(ToString::to_string).unwrap_or_default(),
            }
        } else {
            Self::Request(err)
        }
    }

    /// HTTP status this error carries, when it came from a response
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::AuthenticationFailed { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed response body this error carries, if any
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::BadRequest { data, .. }
            | Self::AuthenticationFailed { data, .. }
            | Self::Forbidden { data, .. }
            | Self::NotFound { data, .. }
            | Self::ServerError { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    /// Whether this error already tore down the stored session (401/403)
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::Forbidden { .. }
        )
    }
}
