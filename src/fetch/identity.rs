//! Rotating outbound identity for retry attempts.
//!
//! Some sites serve block pages keyed on the request's User-Agent. The gate
//! sends a stable identity on the first attempt and rotates to the next one
//! on each retry, so a blocked identity does not doom the whole task.

/// Default User-Agent rotation pool (common desktop browsers).
const DEFAULT_USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Pool of outbound identities, indexed by attempt number.
///
/// Indexing by attempt keeps identity selection deterministic per task,
/// which the retry tests rely on.
#[derive(Debug, Clone)]
pub struct IdentityPool {
    agents: Vec<String>,
}

impl Default for IdentityPool {
    fn default() -> Self {
        Self::new(
            DEFAULT_USER_AGENTS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        )
    }
}

impl IdentityPool {
    /// Creates a pool from the given user-agent strings.
    ///
    /// An empty list falls back to the default pool so the gate always has
    /// an identity to send.
    #[must_use]
    pub fn new(agents: Vec<String>) -> Self {
        if agents.is_empty() {
            Self::default()
        } else {
            Self { agents }
        }
    }

    /// Returns the identity for a zero-indexed attempt.
    ///
    /// Attempt 0 always maps to the first identity; retries walk the pool
    /// in order and wrap around.
    #[must_use]
    pub fn agent(&self, attempt: u32) -> &str {
        let idx = attempt as usize % self.agents.len();
        &self.agents[idx]
    }

    /// Returns the number of identities in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Returns true if the pool is empty (never true in practice).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
