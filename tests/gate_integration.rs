//! Integration tests for the request gate against a mock HTTP server,
//! covering retry bounds, the undersized-body heuristic, identity rotation,
//! per-host spacing, and Retry-After handling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use prospectus_core::fetch::constants::DEFAULT_MIN_BODY_BYTES;
use prospectus_core::{IdentityPool, PageClient, RateLimiter, RequestGate, RetryPolicy};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

/// A page comfortably above the default minimum body size.
fn big_page() -> String {
    format!("<html><body>{}</body></html>", "x".repeat(2000))
}

/// Gate with fast retries and no rate limiting, for deterministic tests.
fn test_gate(max_attempts: u32, min_body_bytes: usize) -> RequestGate {
    RequestGate::new(
        PageClient::new(),
        Arc::new(RateLimiter::disabled()),
        RetryPolicy::with_backoff(max_attempts, Duration::from_millis(5)),
        IdentityPool::default(),
        min_body_bytes,
    )
}

// ==================== Success Tests ====================

#[tokio::test]
async fn test_fetch_returns_document_with_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(big_page()))
        .mount(&server)
        .await;

    let gate = test_gate(3, DEFAULT_MIN_BODY_BYTES);
    let url = format!("{}/page", server.uri());
    let doc = gate.fetch(&url).await.unwrap();

    assert_eq!(doc.url, url);
    assert!(doc.body.len() > DEFAULT_MIN_BODY_BYTES);
}

// ==================== Retry Bound Tests ====================

#[tokio::test]
async fn test_persistent_500_consumes_exactly_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let gate = test_gate(3, 0);
    let err = gate
        .fetch(&format!("{}/down", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.attempts, 3);
    assert!(err.reason.contains("500"));
    server.verify().await;
}

#[tokio::test]
async fn test_transient_failure_then_success_recovers() {
    struct FlakyPage;
    impl Respond for FlakyPage {
        fn respond(&self, _request: &wiremock::Request) -> ResponseTemplate {
            use std::sync::atomic::{AtomicUsize, Ordering};
            static CALLS: AtomicUsize = AtomicUsize::new(0);
            if CALLS.fetch_add(1, Ordering::SeqCst) < 2 {
                ResponseTemplate::new(503)
            } else {
                ResponseTemplate::new(200).set_body_string(
                    format!("<html><body>{}</body></html>", "y".repeat(2000)),
                )
            }
        }
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(FlakyPage)
        .mount(&server)
        .await;

    let gate = test_gate(3, DEFAULT_MIN_BODY_BYTES);
    let doc = gate.fetch(&format!("{}/flaky", server.uri())).await.unwrap();
    assert!(!doc.body.is_empty());
}

// ==================== Undersized Body Tests ====================

#[tokio::test]
async fn test_undersized_body_is_retried_then_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stub"))
        .respond_with(ResponseTemplate::new(200).set_body_string("blocked"))
        .expect(2)
        .mount(&server)
        .await;

    let gate = test_gate(2, DEFAULT_MIN_BODY_BYTES);
    let err = gate
        .fetch(&format!("{}/stub", server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.attempts, 2);
    assert!(err.reason.contains("too small"), "reason: {}", err.reason);
    server.verify().await;
}

#[tokio::test]
async fn test_zero_threshold_accepts_tiny_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tiny"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let gate = test_gate(1, 0);
    let doc = gate.fetch(&format!("{}/tiny", server.uri())).await.unwrap();
    assert_eq!(doc.body, "ok");
}

// ==================== Identity Rotation Tests ====================

#[tokio::test]
async fn test_user_agent_rotates_across_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gate = test_gate(3, 0);
    let _ = gate.fetch(&format!("{}/ua", server.uri())).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    let agents: Vec<&str> = requests
        .iter()
        .map(|r| r.headers.get("user-agent").unwrap().to_str().unwrap())
        .collect();
    // Consecutive attempts present different identities.
    assert_ne!(agents[0], agents[1]);
    assert_ne!(agents[1], agents[2]);
}

// ==================== Rate Limiting Tests ====================

#[tokio::test]
async fn test_same_host_requests_are_spaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spaced"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let min_delay = Duration::from_millis(120);
    let gate = RequestGate::new(
        PageClient::new(),
        Arc::new(RateLimiter::new(min_delay)),
        RetryPolicy::with_backoff(1, Duration::from_millis(5)),
        IdentityPool::default(),
        0,
    );
    let url = format!("{}/spaced", server.uri());

    let start = Instant::now();
    gate.fetch(&url).await.unwrap();
    gate.fetch(&url).await.unwrap();
    gate.fetch(&url).await.unwrap();

    // Three same-host requests need at least two spacing intervals.
    assert!(
        start.elapsed() >= min_delay * 2,
        "elapsed {:?} below two spacing intervals",
        start.elapsed()
    );
}

// ==================== Retry-After Tests ====================

#[tokio::test]
async fn test_429_honors_retry_after_seconds() {
    struct RateLimitedOnce;
    impl Respond for RateLimitedOnce {
        fn respond(&self, _request: &wiremock::Request) -> ResponseTemplate {
            use std::sync::atomic::{AtomicUsize, Ordering};
            static CALLS: AtomicUsize = AtomicUsize::new(0);
            if CALLS.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(429).insert_header("retry-after", "1")
            } else {
                ResponseTemplate::new(200).set_body_string("ok")
            }
        }
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(RateLimitedOnce)
        .mount(&server)
        .await;

    let gate = test_gate(3, 0);
    let start = Instant::now();
    let doc = gate
        .fetch(&format!("{}/limited", server.uri()))
        .await
        .unwrap();

    assert_eq!(doc.body, "ok");
    // The server asked for a 1s pause; the gate must not retry sooner.
    assert!(start.elapsed() >= Duration::from_millis(950));
}
