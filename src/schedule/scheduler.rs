//! Two-wave task scheduler: discovery, then bounded detail fan-out.
//!
//! Wave one fetches every listing URL, discovers detail links, and merges
//! them into one deduplicated frontier. Wave two processes each detail URL
//! under a semaphore: the overview page first, then the configured sections
//! with their own inner fan-out. A college's record is built only after all
//! of its section tasks have joined, so no partially-assembled record ever
//! reaches the aggregator.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::aggregator::ResultAggregator;
use super::progress::Progress;
use crate::config::{ConfigError, ScrapeConfig, SectionSpec};
use crate::extract::{ExtractionPipeline, LinkRule};
use crate::fetch::{IdentityPool, PageClient, RateLimiter, RequestGate, RetryPolicy};
use crate::record::{
    CollegeRecord, RecordData, RecordKind, RunOutcome, ScrapeReport, SectionOutcome,
};

/// Errors that stop a run before or during scheduling.
///
/// Fetch and extraction failures are NOT scheduler errors - they are
/// recorded per college and the run continues.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A worker semaphore was closed while the run was still scheduling.
    #[error("worker semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Orchestrates one scrape run end to end.
pub struct TaskScheduler {
    config: ScrapeConfig,
    gate: Arc<RequestGate>,
    pipeline: Arc<ExtractionPipeline>,
    aggregator: Arc<ResultAggregator>,
    progress: Arc<Progress>,
    cancel: CancellationToken,
}

impl TaskScheduler {
    /// Creates a scheduler from an already-built gate and pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Config`] when the configuration is invalid.
    pub fn new(
        config: ScrapeConfig,
        gate: Arc<RequestGate>,
        pipeline: Arc<ExtractionPipeline>,
    ) -> Result<Self, SchedulerError> {
        config.validate()?;
        Ok(Self {
            config,
            gate,
            pipeline,
            aggregator: Arc::new(ResultAggregator::new()),
            progress: Arc::new(Progress::new()),
            cancel: CancellationToken::new(),
        })
    }

    /// Creates a scheduler with a gate and pipeline built from the config.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Config`] when the configuration is invalid.
    pub fn from_config(config: ScrapeConfig) -> Result<Self, SchedulerError> {
        let gate = Arc::new(RequestGate::new(
            PageClient::new(),
            Arc::new(RateLimiter::new(config.min_delay)),
            RetryPolicy::with_backoff(config.max_attempts, config.retry_base_delay),
            IdentityPool::default(),
            config.min_body_bytes,
        ));
        let pipeline = Arc::new(ExtractionPipeline::default());
        Self::new(config, gate, pipeline)
    }

    /// Shared progress counters, for progress reporting.
    #[must_use]
    pub fn progress(&self) -> Arc<Progress> {
        Arc::clone(&self.progress)
    }

    /// Token that requests a graceful drain: in-flight colleges finish,
    /// no new ones start.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs both waves and drains the aggregator into a report.
    ///
    /// # Errors
    ///
    /// Returns a [`SchedulerError`] only for scheduling-level failures;
    /// per-URL fetch failures land in the report's error list instead.
    #[instrument(skip(self), fields(listings = self.config.listing_urls.len()))]
    pub async fn run(&self) -> Result<ScrapeReport, SchedulerError> {
        let started = Instant::now();

        let detail_urls = self.discover().await?;
        if detail_urls.is_empty() {
            info!("discovery found no detail pages; nothing to visit");
            return Ok(self.aggregator.drain_report(RunOutcome::NoDetailPages));
        }

        let discovered = detail_urls.len();
        self.progress.set_total(discovered);
        info!(discovered, "discovery complete; starting detail wave");

        self.process_details(detail_urls).await?;

        info!(
            discovered,
            completed = self.progress.completed(),
            failed_fetches = self.progress.failed_fetches(),
            elapsed_ms = started.elapsed().as_millis(),
            "run complete"
        );
        Ok(self
            .aggregator
            .drain_report(RunOutcome::Completed { discovered }))
    }

    /// Wave one: fetch listings concurrently and merge their detail links.
    ///
    /// Listing results are merged in listing-URL order regardless of fetch
    /// completion order, so the frontier is deterministic for a fixed set
    /// of responses.
    async fn discover(&self) -> Result<Vec<String>, SchedulerError> {
        let semaphore = Arc::new(Semaphore::new(self.config.listing_concurrency));
        let mut handles: Vec<JoinHandle<Vec<String>>> = Vec::new();

        for listing_url in self.config.listing_urls.clone() {
            if self.cancel.is_cancelled() {
                break;
            }
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                return Err(SchedulerError::SemaphoreClosed);
            };
            let gate = Arc::clone(&self.gate);
            let pipeline = Arc::clone(&self.pipeline);
            let aggregator = Arc::clone(&self.aggregator);
            let progress = Arc::clone(&self.progress);
            let rule = self.config.link_rule.clone();
            let limit = self.config.per_url_limit;

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                discover_one(&gate, &pipeline, &aggregator, &progress, &listing_url, &rule, limit)
                    .await
            }));
        }

        let mut merged: Vec<String> = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(links) => {
                    for link in links {
                        if !merged.contains(&link) {
                            merged.push(link);
                        }
                    }
                }
                Err(e) => warn!(error = %e, "listing task panicked"),
            }
        }
        merged.truncate(self.config.max_detail_urls);
        Ok(merged)
    }

    /// Wave two: process each detail URL under the detail semaphore.
    async fn process_details(&self, detail_urls: Vec<String>) -> Result<(), SchedulerError> {
        let semaphore = Arc::new(Semaphore::new(self.config.detail_concurrency));
        let mut handles = Vec::with_capacity(detail_urls.len());

        for url in detail_urls {
            if self.cancel.is_cancelled() {
                info!("cancellation requested; draining in-flight colleges");
                break;
            }
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                return Err(SchedulerError::SemaphoreClosed);
            };
            let gate = Arc::clone(&self.gate);
            let pipeline = Arc::clone(&self.pipeline);
            let aggregator = Arc::clone(&self.aggregator);
            let progress = Arc::clone(&self.progress);
            let sections = self.config.sections.clone();
            let section_concurrency = self.config.section_concurrency;

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                process_college(
                    url,
                    gate,
                    pipeline,
                    sections,
                    section_concurrency,
                    aggregator,
                    progress,
                )
                .await;
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "college task panicked");
            }
        }
        Ok(())
    }
}

/// Fetches one listing page and discovers its detail links.
///
/// A failed listing fetch contributes an empty link set; the failure is
/// recorded and the run continues with the other listings.
async fn discover_one(
    gate: &RequestGate,
    pipeline: &ExtractionPipeline,
    aggregator: &ResultAggregator,
    progress: &Progress,
    listing_url: &str,
    rule: &LinkRule,
    limit: usize,
) -> Vec<String> {
    match gate.fetch(listing_url).await {
        Ok(doc) => {
            let links = pipeline.discover_links(&doc, rule, limit);
            debug!(url = %listing_url, links = links.len(), "listing processed");
            links
        }
        Err(e) => {
            warn!(url = %listing_url, error = %e, "listing fetch failed");
            progress.mark_failed_fetch();
            aggregator.add_error(e);
            Vec::new()
        }
    }
}

/// Processes one college: overview page, then sections, then the join.
///
/// The record is pushed to the aggregator exactly once, after every section
/// task for this college has finished. Failures are isolated: a failed
/// overview or section never aborts the college's other work.
async fn process_college(
    url: String,
    gate: Arc<RequestGate>,
    pipeline: Arc<ExtractionPipeline>,
    sections: Vec<SectionSpec>,
    section_concurrency: usize,
    aggregator: Arc<ResultAggregator>,
    progress: Arc<Progress>,
) {
    let mut record = CollegeRecord::new(&url);

    match gate.fetch(&url).await {
        Ok(doc) => {
            let overview = pipeline.extract(&doc, RecordKind::Overview).into_iter().next();
            if let Some(extracted) = overview {
                if let RecordData::Overview(data) = extracted.data {
                    record.name.clone_from(&data.name);
                    record.overview = Some(data);
                }
            }
        }
        Err(e) => {
            progress.mark_failed_fetch();
            record.errors.push(e.clone());
            aggregator.add_error(e);
        }
    }

    let base = url.trim_end_matches('/').to_string();
    let semaphore = Arc::new(Semaphore::new(section_concurrency));
    let mut handles = Vec::with_capacity(sections.len());

    for section in sections {
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            warn!(url = %url, section = %section.name, "section semaphore closed");
            break;
        };
        let gate = Arc::clone(&gate);
        let pipeline = Arc::clone(&pipeline);
        let section_url = format!("{base}{}", section.suffix);

        handles.push(tokio::spawn(async move {
            let _permit = permit;
            let outcome = match gate.fetch(&section_url).await {
                Ok(doc) => SectionOutcome::Extracted(pipeline.extract(&doc, section.kind)),
                Err(e) => SectionOutcome::Failed(e),
            };
            (section.name, outcome)
        }));
    }

    for handle in handles {
        match handle.await {
            Ok((name, outcome)) => {
                if let SectionOutcome::Failed(e) = &outcome {
                    progress.mark_failed_fetch();
                    record.errors.push(e.clone());
                    aggregator.add_error(e.clone());
                }
                record.sections.insert(name, outcome);
            }
            Err(e) => warn!(url = %url, error = %e, "section task panicked"),
        }
    }

    debug!(
        url = %record.url,
        name = %record.name,
        sections = record.sections.len(),
        errors = record.errors.len(),
        "college joined"
    );
    aggregator.add(record);
    progress.mark_completed();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(urls: Vec<String>) -> ScrapeConfig {
        ScrapeConfig::new(urls)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = TaskScheduler::from_config(config(vec![]));
        assert!(matches!(
            result,
            Err(SchedulerError::Config(ConfigError::NoListingUrls))
        ));
    }

    #[test]
    fn test_new_accepts_valid_config() {
        let scheduler =
            TaskScheduler::from_config(config(vec!["https://example.com/ranking".to_string()]));
        assert!(scheduler.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_run_visits_nothing() {
        // Cancel before run(): discovery schedules no listings, so the run
        // ends as NoDetailPages without any network traffic.
        let scheduler = TaskScheduler::from_config(config(vec![
            "https://192.0.2.1/unroutable".to_string(),
        ]))
        .unwrap();
        scheduler.cancellation_token().cancel();

        let report = scheduler.run().await.unwrap();
        assert_eq!(report.outcome, RunOutcome::NoDetailPages);
        assert!(report.records.is_empty());
    }
}
