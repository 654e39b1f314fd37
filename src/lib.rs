//! Prospectus Core Library
//!
//! This library implements a polite, concurrent fetch-and-extract engine
//! for college listing sites: it discovers detail pages from listing pages,
//! fetches each college's overview and section pages under bounded
//! concurrency, runs layout-tolerant extraction strategies over the HTML,
//! and aggregates everything into one serializable report.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`fetch`] - Rate-limited, retrying HTTP gate (the only outbound channel)
//! - [`extract`] - Multi-strategy HTML extraction and link discovery
//! - [`schedule`] - Two-wave scheduler, result aggregation, progress
//! - [`record`] - The extracted-data model
//! - [`config`] - Run configuration and validation

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod extract;
pub mod fetch;
pub mod record;
pub mod schedule;

// Re-export commonly used types
pub use config::{ConfigError, ScrapeConfig, SectionSpec, default_sections};
pub use extract::{ExtractionPipeline, LinkRule, RuleSet};
pub use fetch::{
    DEFAULT_MAX_ATTEMPTS, Document, FetchError, IdentityPool, PageClient, RateLimiter,
    RequestGate, RetryPolicy,
};
pub use record::{CollegeRecord, ExtractedRecord, RecordKind, RunOutcome, ScrapeReport};
pub use schedule::{Progress, ResultAggregator, SchedulerError, TaskScheduler};
