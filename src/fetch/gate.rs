//! The request gate: rate-limited, retrying fetch shared by all workers.
//!
//! Every outbound request in the system goes through [`RequestGate::fetch`].
//! The gate spaces same-host requests, rejects undersized bodies, retries
//! with exponential backoff and identity rotation, and converts every
//! failure mode into a plain [`FetchError`] value - nothing escapes the gate
//! as a panic or a propagated error.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument};

use super::client::{Document, PageClient};
use super::error::{FetchError, GateError};
use super::identity::IdentityPool;
use super::rate_limiter::RateLimiter;
use super::retry::{FailureType, RetryDecision, RetryPolicy, classify_error, parse_retry_after};

/// Rate-limited, retrying HTTP fetch gate.
///
/// Constructed once per run and shared via `Arc` across all worker tasks.
/// The only places a worker blocks are inside this type: the per-host
/// spacing wait and the backoff sleep.
#[derive(Debug)]
pub struct RequestGate {
    client: PageClient,
    rate_limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
    identities: IdentityPool,
    min_body_bytes: usize,
}

impl RequestGate {
    /// Creates a gate from its collaborators.
    #[must_use]
    pub fn new(
        client: PageClient,
        rate_limiter: Arc<RateLimiter>,
        policy: RetryPolicy,
        identities: IdentityPool,
        min_body_bytes: usize,
    ) -> Self {
        debug!(
            max_attempts = policy.max_attempts(),
            min_delay_ms = rate_limiter.min_delay().as_millis(),
            min_body_bytes,
            identities = identities.len(),
            "creating request gate"
        );
        Self {
            client,
            rate_limiter,
            policy,
            identities,
            min_body_bytes,
        }
    }

    /// Returns the configured attempt budget.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts()
    }

    /// Fetches a page, spacing, retrying, and rotating identity as needed.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] once all attempts are exhausted (or
    /// immediately for a permanent failure). Callers must treat the error
    /// as a normal result and continue with sibling work.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            self.rate_limiter.acquire(url).await;

            let agent = self.identities.agent(attempt - 1);
            match self.attempt(url, agent).await {
                Ok(doc) => return Ok(doc),
                Err(e) => {
                    let failure = classify_error(&e);

                    // A 429 with a parseable Retry-After overrides backoff.
                    let server_delay = if failure == FailureType::RateLimited {
                        retry_after_delay(&e)
                    } else {
                        None
                    };

                    match self.policy.should_retry(failure, attempt) {
                        RetryDecision::Retry {
                            delay: backoff,
                            attempt: next_attempt,
                        } => {
                            let delay = server_delay.unwrap_or(backoff);
                            info!(
                                url = %url,
                                attempt = next_attempt,
                                max_attempts = self.policy.max_attempts(),
                                delay_ms = delay.as_millis(),
                                using_retry_after = server_delay.is_some(),
                                error = %e,
                                "retrying fetch"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        RetryDecision::DoNotRetry { reason } => {
                            debug!(url = %url, %reason, "giving up on fetch");
                            return Err(FetchError::from_gate_error(url, &e, attempt));
                        }
                    }
                }
            }
        }
    }

    /// One attempt: GET the page and apply the undersized-body heuristic.
    async fn attempt(&self, url: &str, agent: &str) -> Result<Document, GateError> {
        let doc = self.client.get_page(url, agent).await?;
        if doc.body.len() < self.min_body_bytes {
            return Err(GateError::body_too_small(
                url,
                doc.body.len(),
                self.min_body_bytes,
            ));
        }
        Ok(doc)
    }
}

/// Extracts a usable Retry-After delay from a rate-limited error.
fn retry_after_delay(error: &GateError) -> Option<Duration> {
    let GateError::HttpStatus {
        retry_after: Some(header),
        ..
    } = error
    else {
        return None;
    };
    parse_retry_after(header)
}
