//! Error type shared by every provider implementation.
//!
//! Adapters map transport failures (timeouts, HTTP status, connection
//! errors) and upstream service codes onto [`ProviderError`] so that the
//! comparator can treat all three providers alike.

use thiserror::Error;

/// Errors reported by routing, elevation and feature providers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request carried no coordinates.
    ///
    /// Callers should not issue lookups for empty inputs.
    #[error("at least one coordinate is required")]
    EmptyInput,
    /// The request timed out.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP status {status}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request failed before a response was received.
    #[error("network error requesting {url}: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The service answered but reported an application-level error.
    #[error("service returned error code {code}: {message}")]
    ServiceError {
        /// Service-specific error code.
        code: String,
        /// Error detail.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse provider response: {message}")]
    ParseError {
        /// Decoder error detail.
        message: String,
    },
}
