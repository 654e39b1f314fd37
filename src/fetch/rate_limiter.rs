//! Per-host rate limiting shared by every fetch worker.
//!
//! Rate limiting is applied per host key (the URL's authority, `host[:port]`),
//! so requests to different hosts proceed in parallel while successive
//! requests to the *same* host are spaced by at least the configured minimum
//! delay - globally, across all concurrent callers.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Per-host rate limiter.
///
/// Designed to be wrapped in `Arc` and shared across Tokio tasks. Uses
/// `DashMap` for concurrent access to per-host state and `tokio::sync::Mutex`
/// per entry so that same-host callers serialize their spacing sleeps without
/// blocking callers targeting other hosts.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum delay between requests to the same host.
    min_delay: Duration,

    /// Whether rate limiting is disabled (min delay of zero).
    disabled: bool,

    /// Per-host state. The entry Arc is cloned so the DashMap shard lock is
    /// released before awaiting the inner Mutex.
    hosts: DashMap<String, Arc<HostRateState>>,
}

/// Timestamp of the last request issued to one host.
///
/// `None` means the host has not been requested yet; the first request is
/// immediate. Updated only by [`RateLimiter::acquire`], so timestamps are
/// monotonically non-decreasing per host.
#[derive(Debug)]
struct HostRateState {
    last_request: Mutex<Option<Instant>>,
}

impl HostRateState {
    fn new() -> Self {
        Self {
            last_request: Mutex::new(None),
        }
    }
}

impl RateLimiter {
    /// Creates a rate limiter with the given minimum inter-request delay.
    ///
    /// A zero delay disables rate limiting entirely.
    #[must_use]
    #[instrument(skip_all, fields(delay_ms = min_delay.as_millis()))]
    pub fn new(min_delay: Duration) -> Self {
        debug!("creating rate limiter");
        Self {
            min_delay,
            disabled: min_delay.is_zero(),
            hosts: DashMap::new(),
        }
    }

    /// Creates a disabled rate limiter that applies no delays.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Returns whether rate limiting is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns the configured minimum delay.
    #[must_use]
    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Waits until a request to the given URL's host is allowed, then
    /// records the request timestamp.
    ///
    /// The entry lock is held across the spacing sleep so that concurrent
    /// same-host callers queue up behind each other, but never across the
    /// network call that follows.
    #[instrument(skip(self), fields(host))]
    pub async fn acquire(&self, url: &str) {
        if self.disabled {
            return;
        }

        let host = host_key(url);
        tracing::Span::current().record("host", host.as_str());

        let state = self
            .hosts
            .entry(host.clone())
            .or_insert_with(|| Arc::new(HostRateState::new()))
            .clone();

        let mut last_request = state.last_request.lock().await;

        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                let wait = self.min_delay.saturating_sub(elapsed);
                debug!(host = %host, wait_ms = wait.as_millis(), "spacing same-host request");
                tokio::time::sleep(wait).await;
            }
        } else {
            debug!(host = %host, "first request to host");
        }

        *last_request = Some(Instant::now());
    }
}

/// Extracts the host key (authority `host[:port]`, lowercased) from a URL.
///
/// Malformed URLs share an `unknown` bucket so they are still rate limited.
///
/// # Examples
///
/// ```
/// use prospectus_core::fetch::host_key;
///
/// assert_eq!(host_key("https://Example.COM/path"), "example.com");
/// assert_eq!(host_key("http://localhost:8080/x"), "localhost:8080");
/// assert_eq!(host_key("not a url"), "unknown");
/// ```
#[must_use]
pub fn host_key(url: &str) -> String {
    let Ok(parsed) = url::Url::parse(url) else {
        return "unknown".to_string();
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}:{port}", host.to_lowercase()),
        (Some(host), None) => host.to_lowercase(),
        (None, _) => "unknown".to_string(),
    }
}
