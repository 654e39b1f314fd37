//! Strategy runner: fixed-priority extraction with dedup and capping.
//!
//! For each record kind the pipeline tries its strategies in a fixed order
//! and stops at the first one that yields at least one record, then
//! deduplicates and caps the output. For a fixed document and kind the
//! output is fully deterministic.

use scraper::Html;
use tracing::debug;

use super::dedup::dedup_records;
use super::links::{LinkRule, discover_detail_links};
use super::rules::RuleSet;
use super::strategies::{
    Strategy, admission_freetext, admission_table, course_containers, course_freetext,
    course_table, overview_heading, overview_title, placement_freetext, placement_table,
};
use crate::fetch::Document;
use crate::record::{ExtractedRecord, RecordKind};

/// Default cap on records returned per extraction.
pub const DEFAULT_MAX_RECORDS: usize = 20;

/// Default minimum normalized-title length kept by dedup.
pub const DEFAULT_MIN_TITLE_LEN: usize = 3;

const COURSE_STRATEGIES: &[Strategy] = &[course_table, course_containers, course_freetext];
const OVERVIEW_STRATEGIES: &[Strategy] = &[overview_heading, overview_title];
const ADMISSION_STRATEGIES: &[Strategy] = &[admission_table, admission_freetext];
const PLACEMENT_STRATEGIES: &[Strategy] = &[placement_table, placement_freetext];

/// Multi-strategy extraction pipeline.
///
/// Stateless between calls; safe to share via `Arc` across workers.
/// Extraction is CPU-bound and never suspends.
#[derive(Debug)]
pub struct ExtractionPipeline {
    rules: RuleSet,
    max_records: usize,
    min_title_len: usize,
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

impl ExtractionPipeline {
    /// Creates a pipeline over the given rule table with default limits.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            max_records: DEFAULT_MAX_RECORDS,
            min_title_len: DEFAULT_MIN_TITLE_LEN,
        }
    }

    /// Overrides the per-extraction record cap.
    #[must_use]
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    /// Runs the strategies for `kind` against the document.
    ///
    /// Returns an empty vector (not an error) when no strategy matches the
    /// page layout.
    #[must_use]
    pub fn extract(&self, doc: &Document, kind: RecordKind) -> Vec<ExtractedRecord> {
        let html = Html::parse_document(&doc.body);

        let strategies: &[Strategy] = match kind {
            RecordKind::Overview => OVERVIEW_STRATEGIES,
            RecordKind::CourseList => COURSE_STRATEGIES,
            RecordKind::AdmissionInfo => ADMISSION_STRATEGIES,
            RecordKind::PlacementStats => PLACEMENT_STRATEGIES,
        };

        let mut records = Vec::new();
        for strategy in strategies {
            records = strategy(&html, &self.rules);
            if !records.is_empty() {
                break;
            }
        }

        let raw = records.len();
        let mut records = dedup_records(records, self.min_title_len);
        records.truncate(self.max_records);

        debug!(
            url = %doc.url,
            ?kind,
            raw,
            kept = records.len(),
            "extraction complete"
        );
        records
    }

    /// Discovers candidate detail URLs from a listing document.
    #[must_use]
    pub fn discover_links(&self, doc: &Document, rule: &LinkRule, limit: usize) -> Vec<String> {
        discover_detail_links(doc, rule, limit)
    }
}
