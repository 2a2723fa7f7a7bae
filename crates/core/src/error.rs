//! Common error types for configuration, storage and sessions

use crate::session::Role;

/// Standard result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Core error types shared across the client crates
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Configuration value is malformed or inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A persisted value could not be serialized or parsed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No session record is present
    #[error("No authenticated session")]
    Unauthenticated,

    /// A session exists but carries the wrong role for the page
    #[error("Access denied: session role is {found}, {expected} required")]
    RoleMismatch {
        /// Role the page requires
        expected: Role,
        /// Role the stored session carries
        found: Role,
    },
}
