//! Custom error types for the common library
//!
//! This module defines the errors raised by the realtime store backends.

use redis::RedisError;
use thiserror::Error;

/// Custom error type for realtime store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error talking to the Redis backend
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    /// A stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The path could not be parsed or addresses nothing
    #[error("Invalid store path: {0}")]
    InvalidPath(String),

    /// The backend cannot store the given value shape
    #[error("Unsupported by this store: {0}")]
    Unsupported(String),

    /// Configuration error
    #[error("Store configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
