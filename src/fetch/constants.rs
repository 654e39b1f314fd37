//! Constants for the fetch module (timeouts, thresholds).

use std::time::Duration;

/// Default HTTP connect timeout (15 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 15;

/// Default HTTP read timeout (30 seconds - these are HTML pages, not files).
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Default minimum body size in bytes below which a response is rejected
/// as a likely block or placeholder page.
///
/// This heuristic is untested against real block-page sizes, which is why it
/// is a configuration field rather than a hard-wired constant.
pub const DEFAULT_MIN_BODY_BYTES: usize = 1000;

/// Default minimum inter-request delay per host (1 second).
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(1000);

/// Maximum Retry-After header value (1 hour) to prevent excessive delays.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(3600);
