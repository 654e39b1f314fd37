//! Error types for the fetch module.
//!
//! [`GateError`] is the internal per-attempt error; callers of the gate only
//! ever see [`FetchError`], the flattened terminal value produced after all
//! attempts are exhausted. The gate never propagates anything past that
//! boundary.

use serde::Serialize;
use thiserror::Error;

/// Errors a single fetch attempt can produce.
#[derive(Debug, Error)]
pub enum GateError {
    /// Network-level error (DNS resolution, connection refused, TLS, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP response (4xx, 5xx).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The Retry-After header value, if present (for 429 responses).
        retry_after: Option<String>,
    },

    /// Response body below the configured minimum size; treated as a likely
    /// block or placeholder page.
    #[error("response too small fetching {url}: {bytes} bytes (minimum {min_bytes})")]
    BodyTooSmall {
        /// The URL that returned the undersized body.
        url: String,
        /// Actual body size.
        bytes: usize,
        /// Configured minimum.
        min_bytes: usize,
    },

    /// The provided URL is malformed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl GateError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            retry_after: None,
        }
    }

    /// Creates an HTTP status error carrying a Retry-After header value.
    pub fn http_status_with_retry_after(
        url: impl Into<String>,
        status: u16,
        retry_after: Option<String>,
    ) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            retry_after,
        }
    }

    /// Creates an undersized-body error.
    pub fn body_too_small(url: impl Into<String>, bytes: usize, min_bytes: usize) -> Self {
        Self::BodyTooSmall {
            url: url.into(),
            bytes,
            min_bytes,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

/// Terminal failure for one URL, returned by the gate after exhausting
/// retries.
///
/// Callers must treat this as a normal result, not an exceptional one: the
/// scheduler records it and continues with sibling work.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{url} failed after {attempts} attempt(s): {reason}")]
pub struct FetchError {
    /// The URL that could not be fetched.
    pub url: String,
    /// Human-readable reason from the last attempt.
    pub reason: String,
    /// Total number of attempts made.
    pub attempts: u32,
}

impl FetchError {
    /// Creates a terminal fetch error from the last attempt's error.
    #[must_use]
    pub fn from_gate_error(url: impl Into<String>, last: &GateError, attempts: u32) -> Self {
        Self {
            url: url.into(),
            reason: last.to_string(),
            attempts,
        }
    }
}
