//! Run configuration and validation.
//!
//! A [`ScrapeConfig`] fully describes one run: the listing URLs to start
//! from, the sections to fetch per detail page, concurrency widths for each
//! stage, and the politeness/retry knobs handed down to the request gate.
//! [`ScrapeConfig::validate`] rejects inconsistent configurations before any
//! network traffic happens.

use std::time::Duration;

use thiserror::Error;

use crate::extract::LinkRule;
use crate::fetch::DEFAULT_MAX_ATTEMPTS;
use crate::fetch::constants::{DEFAULT_MIN_BODY_BYTES, DEFAULT_MIN_DELAY};
use crate::record::RecordKind;

/// Valid range for every concurrency width.
pub const CONCURRENCY_RANGE: std::ops::RangeInclusive<usize> = 1..=100;

/// One section fetched per detail page.
#[derive(Debug, Clone)]
pub struct SectionSpec {
    /// Key under which the section appears in the output record.
    pub name: String,
    /// Path suffix appended to the detail URL, e.g. `/courses`.
    pub suffix: String,
    /// Which extraction strategies apply to the section's pages.
    pub kind: RecordKind,
}

impl SectionSpec {
    #[must_use]
    pub fn new(name: &str, suffix: &str, kind: RecordKind) -> Self {
        Self {
            name: name.to_string(),
            suffix: suffix.to_string(),
            kind,
        }
    }
}

/// The default section set for college detail pages.
#[must_use]
pub fn default_sections() -> Vec<SectionSpec> {
    vec![
        SectionSpec::new("courses", "/courses", RecordKind::CourseList),
        SectionSpec::new("admissions", "/admission", RecordKind::AdmissionInfo),
        SectionSpec::new("placements", "/placement", RecordKind::PlacementStats),
    ]
}

/// Everything a run needs to know, resolved before the scheduler starts.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Listing pages crawled in wave one.
    pub listing_urls: Vec<String>,
    /// Cap on detail links taken from a single listing page.
    pub per_url_limit: usize,
    /// Cap on the merged detail URL set across all listings.
    pub max_detail_urls: usize,
    /// Sections fetched per detail page, in output order.
    pub sections: Vec<SectionSpec>,
    /// Workers for listing fetches (wave one).
    pub listing_concurrency: usize,
    /// Workers for detail pages (wave two, outer level).
    pub detail_concurrency: usize,
    /// Workers for sections within one detail page.
    pub section_concurrency: usize,
    /// Minimum spacing between requests to the same host.
    pub min_delay: Duration,
    /// Attempt ceiling per URL.
    pub max_attempts: u32,
    /// First retry backoff; doubles per attempt.
    pub retry_base_delay: Duration,
    /// Bodies smaller than this are rejected as block pages.
    pub min_body_bytes: usize,
    /// Filter applied to anchors during detail-link discovery.
    pub link_rule: LinkRule,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            listing_urls: Vec::new(),
            per_url_limit: 20,
            max_detail_urls: 20,
            sections: default_sections(),
            listing_concurrency: 3,
            detail_concurrency: 5,
            section_concurrency: 4,
            min_delay: DEFAULT_MIN_DELAY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: Duration::from_millis(500),
            min_body_bytes: DEFAULT_MIN_BODY_BYTES,
            link_rule: LinkRule::default(),
        }
    }
}

impl ScrapeConfig {
    /// Builds a config for the given listing URLs with default knobs.
    #[must_use]
    pub fn new(listing_urls: Vec<String>) -> Self {
        Self {
            listing_urls,
            ..Self::default()
        }
    }

    /// Checks the configuration for contradictions.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listing_urls.is_empty() {
            return Err(ConfigError::NoListingUrls);
        }
        if self.sections.is_empty() {
            return Err(ConfigError::NoSections);
        }
        for section in &self.sections {
            if section.suffix.is_empty() {
                return Err(ConfigError::EmptySectionSuffix {
                    name: section.name.clone(),
                });
            }
        }
        for (stage, value) in [
            ("listing", self.listing_concurrency),
            ("detail", self.detail_concurrency),
            ("section", self.section_concurrency),
        ] {
            if !CONCURRENCY_RANGE.contains(&value) {
                return Err(ConfigError::InvalidConcurrency { stage, value });
            }
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroMaxAttempts);
        }
        if self.per_url_limit == 0 || self.max_detail_urls == 0 {
            return Err(ConfigError::ZeroUrlLimit);
        }
        Ok(())
    }
}

/// Configuration rejections, reported before the run starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no listing URLs provided")]
    NoListingUrls,

    #[error("no sections configured")]
    NoSections,

    #[error("section '{name}' has an empty URL suffix")]
    EmptySectionSuffix { name: String },

    #[error("{stage} concurrency {value} outside 1..=100")]
    InvalidConcurrency { stage: &'static str, value: usize },

    #[error("max attempts must be at least 1")]
    ZeroMaxAttempts,

    #[error("URL limits must be at least 1")]
    ZeroUrlLimit,
}
