//! Retry policy with exponential backoff for failed fetch attempts.
//!
//! Every attempt's error is classified into a [`FailureType`], and the
//! [`RetryPolicy`] decides whether to try again and after what delay. The
//! gate retries on any transport error, any non-success status, and
//! undersized bodies; only a malformed URL is permanent, since repeating the
//! request cannot fix it.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, instrument, warn};

use super::constants::MAX_RETRY_AFTER;
use super::error::GateError;

/// Default maximum attempts per URL (including the initial attempt).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for exponential backoff.
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Default maximum backoff cap.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(32);

/// Default backoff multiplier (doubles each attempt).
const DEFAULT_BACKOFF_MULTIPLIER: f32 = 2.0;

/// Upper bound on the jitter added to any delay.
const MAX_JITTER: Duration = Duration::from_millis(500);

/// Classification of a failed fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// May succeed on retry: transport errors, timeouts, non-success
    /// statuses, undersized bodies.
    Transient,

    /// Server rate limiting (HTTP 429); retried, honoring Retry-After.
    RateLimited,

    /// Won't succeed regardless of retries (malformed URL).
    Permanent,
}

/// Decision on whether to retry a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the given delay.
    Retry {
        /// How long to wait before retrying.
        delay: Duration,
        /// The attempt number about to run (1-indexed).
        attempt: u32,
    },

    /// Do not retry.
    DoNotRetry {
        /// Human-readable reason.
        reason: String,
    },
}

/// Configuration for retry behavior with exponential backoff.
///
/// Delay formula: `min(base_delay * multiplier^(attempt-1), max_delay)`
/// plus jitter in `0..=max_jitter`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f32,
    max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            max_jitter: MAX_JITTER,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with explicit settings.
    ///
    /// `max_attempts` is clamped to at least 1. Jitter is capped at the
    /// base delay so short-delay configurations (tests, aggressive runs)
    /// stay fast.
    #[must_use]
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f32,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
            backoff_multiplier,
            max_jitter: base_delay.min(MAX_JITTER),
        }
    }

    /// Creates a policy with a custom attempt budget and default backoff.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Creates a policy with a custom attempt budget and base delay.
    #[must_use]
    pub fn with_backoff(max_attempts: u32, base_delay: Duration) -> Self {
        Self::new(
            max_attempts,
            base_delay,
            DEFAULT_MAX_DELAY,
            DEFAULT_BACKOFF_MULTIPLIER,
        )
    }

    /// Returns the maximum number of attempts.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decides whether the attempt that just failed should be retried.
    ///
    /// `attempt` is the 1-indexed number of the attempt that failed.
    #[instrument(skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if failure_type == FailureType::Permanent {
            return RetryDecision::DoNotRetry {
                reason: "permanent failure - retry would not help".to_string(),
            };
        }

        if attempt >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "attempts exhausted");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        let delay = self.calculate_delay(attempt);
        debug!(
            attempt,
            next_attempt = attempt + 1,
            delay_ms = delay.as_millis(),
            "will retry"
        );

        RetryDecision::Retry {
            delay,
            attempt: attempt + 1,
        }
    }

    /// Calculates the backoff delay for a retry after the given attempt.
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as f64;
        let exponent = f64::from(attempt.saturating_sub(1));
        let delay_ms = base_ms * f64::from(self.backoff_multiplier).powf(exponent);
        let capped_ms = delay_ms.min(self.max_delay.as_millis() as f64);

        Duration::from_millis(capped_ms as u64) + self.calculate_jitter()
    }

    /// Generates random jitter to desynchronize simultaneous retries.
    fn calculate_jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        let mut rng = rand::thread_rng();
        Duration::from_millis(rng.gen_range(0..=max_ms))
    }
}

/// Classifies a fetch attempt error for the retry decision.
///
/// Transport errors, timeouts, non-success statuses, and undersized bodies
/// are all retryable; a 429 is rate limiting; only a malformed URL is
/// permanent.
#[must_use]
pub fn classify_error(error: &GateError) -> FailureType {
    match error {
        GateError::HttpStatus { status: 429, .. } => FailureType::RateLimited,
        GateError::HttpStatus { .. }
        | GateError::Network { .. }
        | GateError::Timeout { .. }
        | GateError::BodyTooSmall { .. } => FailureType::Transient,
        GateError::InvalidUrl { .. } => FailureType::Permanent,
    }
}

/// Parses a Retry-After header value into a Duration.
///
/// Supports both RFC 7231 formats: integer seconds and HTTP-date. Values
/// are capped at one hour; negative or unparseable values yield `None`.
#[must_use]
pub fn parse_retry_after(header_value: &str) -> Option<Duration> {
    let header_value = header_value.trim();

    if let Ok(seconds) = header_value.parse::<i64>() {
        if seconds < 0 {
            debug!(seconds, "negative Retry-After value, ignoring");
            return None;
        }
        #[allow(clippy::cast_sign_loss)]
        let duration = Duration::from_secs(seconds as u64);
        if duration > MAX_RETRY_AFTER {
            warn!(
                seconds,
                max_seconds = MAX_RETRY_AFTER.as_secs(),
                "Retry-After exceeds maximum, capping"
            );
            return Some(MAX_RETRY_AFTER);
        }
        return Some(duration);
    }

    if let Ok(datetime) = httpdate::parse_http_date(header_value) {
        let now = std::time::SystemTime::now();
        return match datetime.duration_since(now) {
            Ok(duration) if duration > MAX_RETRY_AFTER => Some(MAX_RETRY_AFTER),
            Ok(duration) => Some(duration),
            // Date in the past: no extra wait needed.
            Err(_) => Some(Duration::ZERO),
        };
    }

    debug!(header_value, "unparseable Retry-After value");
    None
}
