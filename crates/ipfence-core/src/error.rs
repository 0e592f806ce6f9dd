//! Error types for the membership store
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the membership store
#[derive(Error, Debug)]
pub enum Error {
    /// CIDR text failed to parse, the prefix is out of range for its
    /// family, or the family cannot be determined
    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    /// A removal targeted an address or canonical network that is not in
    /// the store
    #[error("resource does not exist: {0}")]
    ResourceDoesNotExist(String),

    /// `open_store` was given a name with no registered factory
    #[error("unknown backend: {0} (forgotten registration?)")]
    UnknownBackend(String),

    /// An operation was issued on a store that has been stopped
    #[error("store is stopped")]
    StoreStopped,

    /// Backend-specific error, surfaced unchanged from the backend
    #[error("backend error: {0}")]
    Backend(String),

    /// Backend params deserialization errors
    #[error("params error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid network error
    pub fn invalid_network(msg: impl Into<String>) -> Self {
        Self::InvalidNetwork(msg.into())
    }

    /// Create a "resource does not exist" error
    pub fn does_not_exist(msg: impl Into<String>) -> Self {
        Self::ResourceDoesNotExist(msg.into())
    }

    /// Create an unknown backend error
    pub fn unknown_backend(name: impl Into<String>) -> Self {
        Self::UnknownBackend(name.into())
    }

    /// Create a backend-specific error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
