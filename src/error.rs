//! Error types for the cache and factory
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Configuration-time errors raised by the cache layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must be a positive number of entries
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Request could not be built from the given input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == Fetch Error Enum ==
/// Failures produced by item/list types while fetching or creating.
///
/// `Clone` so a shared pending fetch can hand the same failure to every
/// caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The backing source has nothing for this request
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backing source refused the request
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Any other failure while talking to the backing source
    #[error("Fetch failed: {0}")]
    Failed(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
