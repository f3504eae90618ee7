//! Error types for icon_hydrator
//!
//! Every variant here is absorbed inside the hydrator and reported to callers
//! as "no icon available". They only surface from the lower-level APIs
//! (`ModrinthClient`, the stores) and from the CLI's own file handling.

use thiserror::Error;

/// Unified error type for icon_hydrator operations
#[derive(Debug, Error)]
pub enum HydrateError {
    /// HTTP request failed (connection refused, DNS, body read, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// The call did not finish inside its time budget and was cancelled
    #[error("Request timed out after {0} ms")]
    Timeout(u128),

    /// Failed to parse JSON (response body or cache file)
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Key-value store could not complete a write or removal
    #[error("Store error: {0}")]
    Store(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for icon_hydrator operations
pub type Result<T> = std::result::Result<T, HydrateError>;
