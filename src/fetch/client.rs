//! HTTP client wrapper for fetching HTML pages.
//!
//! One [`PageClient`] is created per run and reused by every worker, taking
//! advantage of connection pooling. It performs a single GET and returns the
//! decoded body; retry and rate-limit decisions belong to the gate.

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::GateError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// A successfully fetched page.
///
/// Holds the final URL (after redirects) and the decoded body. The body is
/// kept as a string rather than a parsed tree so documents can cross task
/// boundaries; the extraction pipeline parses on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Final URL of the response, used as the base for link resolution.
    pub url: String,
    /// Decoded response body.
    pub body: String,
}

/// HTTP client for fetching pages with per-request identity headers.
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
}

impl Default for PageClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PageClient {
    /// Creates a client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values in seconds.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = ClientBuilder::new()
            .connect_timeout(std::time::Duration::from_secs(connect_timeout_secs))
            .timeout(std::time::Duration::from_secs(read_timeout_secs))
            .cookie_store(true)
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Performs one GET request and returns the decoded page.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidUrl`] for unparseable URLs,
    /// [`GateError::Timeout`] / [`GateError::Network`] for transport
    /// failures, and [`GateError::HttpStatus`] for non-success responses
    /// (carrying the Retry-After header value when the server sent one).
    #[instrument(skip(self, user_agent))]
    pub async fn get_page(&self, url: &str, user_agent: &str) -> Result<Document, GateError> {
        let parsed = Url::parse(url).map_err(|_| GateError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GateError::timeout(url)
                } else {
                    GateError::network(url, e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string);
            return Err(GateError::http_status_with_retry_after(
                url,
                status.as_u16(),
                retry_after,
            ));
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GateError::timeout(url)
            } else {
                GateError::network(url, e)
            }
        })?;

        debug!(url = %final_url, bytes = body.len(), "page fetched");
        Ok(Document {
            url: final_url,
            body,
        })
    }
}
