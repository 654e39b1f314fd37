//! Rate-limited, retrying HTTP fetch gate.
//!
//! This module owns the system's single outbound channel: per-host request
//! spacing, bounded retries with exponential backoff and jitter, identity
//! rotation, Retry-After handling, and the undersized-body block-page
//! heuristic. Everything above it consumes the gate's one operation,
//! [`RequestGate::fetch`], and receives either a [`Document`] or a
//! [`FetchError`] - never an exception.

pub mod constants;
mod client;
mod error;
mod gate;
mod identity;
pub mod rate_limiter;
mod retry;

pub use client::{Document, PageClient};
pub use error::{FetchError, GateError};
pub use gate::RequestGate;
pub use identity::IdentityPool;
pub use rate_limiter::{RateLimiter, host_key};
pub use retry::{
    DEFAULT_MAX_ATTEMPTS, FailureType, RetryDecision, RetryPolicy, classify_error,
    parse_retry_after,
};
