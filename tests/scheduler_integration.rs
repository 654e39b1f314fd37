//! End-to-end scheduler tests against a mock HTTP server: discovery,
//! bounded detail fan-out, per-college joins, failure isolation, and the
//! empty-discovery outcome.

use std::sync::Arc;
use std::time::{Duration, Instant};

use prospectus_core::record::{RecordData, SectionOutcome};
use prospectus_core::{
    ExtractionPipeline, IdentityPool, LinkRule, PageClient, RateLimiter, RequestGate, RetryPolicy,
    RunOutcome, ScrapeConfig, TaskScheduler,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLEGES: [&str; 3] = ["alpha", "beta", "gamma"];

fn listing_page(base: &str) -> String {
    let mut body = String::from("<html><body><h1>Top Colleges</h1><ul>");
    for college in COLLEGES {
        body.push_str(&format!(
            r#"<li><a href="{base}/university/{college}">College {college}</a></li>"#
        ));
    }
    body.push_str(r#"<a href="/news/today">News</a></ul></body></html>"#);
    body
}

fn overview_page(college: &str) -> String {
    format!(
        "<html><head><title>College {college}</title></head><body>\
         <h1>College {college} Institute</h1>\
         <p>Established in 1985. Located in Chennai, Tamil Nadu.</p>\
         </body></html>"
    )
}

fn courses_page() -> String {
    "<html><body><table>\
     <tr><th>Course</th><th>Details</th></tr>\
     <tr><td>B.Tech Computer Science</td><td>4 years, ₹ 2,00,000</td></tr>\
     <tr><td>Campus Tour</td><td>not a course</td></tr>\
     </table></body></html>"
        .to_string()
}

fn admission_page() -> String {
    "<html><body><p>Admission via JEE and GATE. Application fee: ₹ 1,500</p></body></html>"
        .to_string()
}

fn placement_page() -> String {
    "<html><body><p>92% placement rate. Recruiters include Microsoft and TCS.</p></body></html>"
        .to_string()
}

/// Mounts the listing page plus all four pages for each college.
async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/ranking"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&server.uri())))
        .mount(server)
        .await;

    for college in COLLEGES {
        mount_college(server, college).await;
    }
}

async fn mount_college(server: &MockServer, college: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/university/{college}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(overview_page(college)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/university/{college}/courses")))
        .respond_with(ResponseTemplate::new(200).set_body_string(courses_page()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/university/{college}/admission")))
        .respond_with(ResponseTemplate::new(200).set_body_string(admission_page()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/university/{college}/placement")))
        .respond_with(ResponseTemplate::new(200).set_body_string(placement_page()))
        .mount(server)
        .await;
}

/// Test config: tiny bodies accepted, fast retries, short host spacing.
fn test_config(server: &MockServer, min_delay: Duration) -> ScrapeConfig {
    ScrapeConfig {
        listing_urls: vec![format!("{}/ranking", server.uri())],
        min_delay,
        min_body_bytes: 0,
        retry_base_delay: Duration::from_millis(10),
        link_rule: LinkRule {
            host_filter: None,
            path_keyword: Some("university".to_string()),
        },
        ..ScrapeConfig::default()
    }
}

fn test_scheduler(config: ScrapeConfig) -> TaskScheduler {
    let gate = Arc::new(RequestGate::new(
        PageClient::new(),
        Arc::new(RateLimiter::new(config.min_delay)),
        RetryPolicy::with_backoff(config.max_attempts, config.retry_base_delay),
        IdentityPool::default(),
        config.min_body_bytes,
    ));
    let pipeline = Arc::new(ExtractionPipeline::default());
    TaskScheduler::new(config, gate, pipeline).unwrap()
}

// ==================== End-to-End Tests ====================

#[tokio::test]
async fn test_three_colleges_end_to_end() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let min_delay = Duration::from_millis(50);
    let scheduler = test_scheduler(test_config(&server, min_delay));

    let start = Instant::now();
    let report = scheduler.run().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed { discovered: 3 });
    assert_eq!(report.records.len(), 3);
    assert!(report.errors.is_empty());

    for record in &report.records {
        assert!(record.name.starts_with("College "));
        assert!(record.name.ends_with("Institute"));

        let overview = record.overview.as_ref().unwrap();
        assert_eq!(overview.established.as_deref(), Some("1985"));
        assert_eq!(overview.location.as_deref(), Some("Chennai, Tamil Nadu"));

        assert_eq!(record.sections.len(), 3);
        let SectionOutcome::Extracted(courses) = &record.sections["courses"] else {
            panic!("courses section failed");
        };
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title().unwrap(), "B.Tech Computer Science");

        let SectionOutcome::Extracted(admissions) = &record.sections["admissions"] else {
            panic!("admissions section failed");
        };
        let RecordData::Admission(admission) = &admissions[0].data else {
            panic!("wrong payload kind");
        };
        assert_eq!(admission.entrance_exams, vec!["JEE", "GATE"]);

        let SectionOutcome::Extracted(placements) = &record.sections["placements"] else {
            panic!("placements section failed");
        };
        let RecordData::Placement(placement) = &placements[0].data else {
            panic!("wrong payload kind");
        };
        assert_eq!(placement.placement_rate.as_deref(), Some("92%"));
    }

    // 13 same-host requests must be spaced; two intervals is a safe floor.
    assert!(
        start.elapsed() >= min_delay * 2,
        "run finished too fast for host spacing: {:?}",
        start.elapsed()
    );
}

// ==================== Failure Isolation Tests ====================

#[tokio::test]
async fn test_failed_section_does_not_sink_the_college() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ranking"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<a href="{0}/university/alpha">A</a><a href="{0}/university/beta">B</a>"#,
            server.uri()
        )))
        .mount(&server)
        .await;
    mount_college(&server, "beta").await;

    // Alpha's course page is down; everything else works.
    Mock::given(method("GET"))
        .and(path("/university/alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_string(overview_page("alpha")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/university/alpha/courses"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/university/alpha/admission"))
        .respond_with(ResponseTemplate::new(200).set_body_string(admission_page()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/university/alpha/placement"))
        .respond_with(ResponseTemplate::new(200).set_body_string(placement_page()))
        .mount(&server)
        .await;

    let scheduler = test_scheduler(test_config(&server, Duration::ZERO));
    let report = scheduler.run().await.unwrap();

    assert_eq!(report.records.len(), 2);

    let alpha = report
        .records
        .iter()
        .find(|r| r.url.ends_with("/alpha"))
        .unwrap();
    // The failed section still appears, marked failed with its attempt count.
    assert_eq!(alpha.sections.len(), 3);
    let SectionOutcome::Failed(error) = &alpha.sections["courses"] else {
        panic!("courses section should have failed");
    };
    assert_eq!(error.attempts, 3);
    assert!(alpha.sections["admissions"].is_extracted());
    assert!(alpha.sections["placements"].is_extracted());
    assert_eq!(alpha.errors.len(), 1);

    let beta = report
        .records
        .iter()
        .find(|r| r.url.ends_with("/beta"))
        .unwrap();
    assert!(beta.errors.is_empty());
    assert_eq!(beta.sections.len(), 3);

    // The run-level error list mirrors the per-college failure.
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].url.ends_with("/alpha/courses"));
}

#[tokio::test]
async fn test_failed_overview_still_fetches_sections() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ranking"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<a href="{}/university/alpha">A</a>"#,
            server.uri()
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/university/alpha"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/university/alpha/courses"))
        .respond_with(ResponseTemplate::new(200).set_body_string(courses_page()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/university/alpha/admission"))
        .respond_with(ResponseTemplate::new(200).set_body_string(admission_page()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/university/alpha/placement"))
        .respond_with(ResponseTemplate::new(200).set_body_string(placement_page()))
        .mount(&server)
        .await;

    let scheduler = test_scheduler(test_config(&server, Duration::ZERO));
    let report = scheduler.run().await.unwrap();

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.name, "Unknown");
    assert!(record.overview.is_none());
    assert_eq!(record.errors.len(), 1);
    assert!(record.sections.values().all(SectionOutcome::is_extracted));
}

// ==================== Discovery Outcome Tests ====================

#[tokio::test]
async fn test_listing_without_detail_links_ends_as_no_detail_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ranking"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/news/today">no colleges here</a>"#),
        )
        .mount(&server)
        .await;

    let scheduler = test_scheduler(test_config(&server, Duration::ZERO));
    let report = scheduler.run().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::NoDetailPages);
    assert!(report.records.is_empty());
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn test_failed_listing_is_reported_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ranking"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let scheduler = test_scheduler(test_config(&server, Duration::ZERO));
    let report = scheduler.run().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::NoDetailPages);
    assert!(report.records.is_empty());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].attempts, 3);
}

// ==================== Frontier Cap Tests ====================

#[tokio::test]
async fn test_max_detail_urls_caps_the_frontier() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let mut config = test_config(&server, Duration::ZERO);
    config.max_detail_urls = 2;
    let scheduler = test_scheduler(config);
    let report = scheduler.run().await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Completed { discovered: 2 });
    assert_eq!(report.records.len(), 2);
}
