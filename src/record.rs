//! Data model for extracted records and per-college aggregates.
//!
//! Records flow from the extraction pipeline into [`CollegeRecord`]s, which
//! are assembled by the scheduler once every requested section for a detail
//! URL has either produced data or failed. Everything here is serializable
//! so downstream CSV/JSON writers can consume a run's output directly.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::fetch::FetchError;

/// The kind of record a page is expected to yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    /// College identity data from the detail page itself.
    Overview,
    /// Degree programmes offered, one record per course.
    CourseList,
    /// Entrance exams and application fee information.
    AdmissionInfo,
    /// Placement rate, average package, and recruiter names.
    PlacementStats,
}

/// Which extraction heuristic produced a record.
///
/// Carried on every record for observability: when a page layout changes,
/// the strategy distribution in the output shows which heuristics still fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceStrategy {
    /// Structured-table strategy (rows of a `<table>`).
    Table,
    /// Structured-container strategy (repeated card/list-item elements).
    Container,
    /// Free-text pattern strategy over the full page text.
    FreeText,
}

/// Identity data extracted from a college's main page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewData {
    /// College name.
    pub name: String,
    /// City/state string when a location pattern matched.
    pub location: Option<String>,
    /// Four-digit establishment year when found.
    pub established: Option<String>,
}

/// One degree programme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseData {
    /// Programme name (the dedup key, after normalization).
    pub name: String,
    /// Fee string as found on the page, e.g. `₹ 2,50,000`.
    pub fees: Option<String>,
    /// Normalized duration, e.g. `4 Years`.
    pub duration: Option<String>,
    /// Seat/intake count.
    pub seats: Option<String>,
}

/// Admission information for one college.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdmissionData {
    /// Entrance exams mentioned on the page, in rule-table order.
    pub entrance_exams: Vec<String>,
    /// Application fee string when found.
    pub application_fee: Option<String>,
}

/// Placement statistics for one college.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementData {
    /// Placement rate, e.g. `92.5%`.
    pub placement_rate: Option<String>,
    /// Average package, e.g. `₹8.5 LPA`.
    pub average_package: Option<String>,
    /// Recruiters mentioned on the page, in rule-table order.
    pub top_recruiters: Vec<String>,
}

/// Typed payload of an extracted record, polymorphic over [`RecordKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RecordData {
    /// Overview payload.
    Overview(OverviewData),
    /// Course payload.
    Course(CourseData),
    /// Admission payload.
    Admission(AdmissionData),
    /// Placement payload.
    Placement(PlacementData),
}

/// One record produced by the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    /// The heuristic that produced this record.
    pub strategy: SourceStrategy,
    /// The typed payload.
    pub data: RecordData,
}

impl ExtractedRecord {
    /// Creates a record tagged with the strategy that produced it.
    #[must_use]
    pub fn new(strategy: SourceStrategy, data: RecordData) -> Self {
        Self { strategy, data }
    }

    /// Returns the record kind this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self.data {
            RecordData::Overview(_) => RecordKind::Overview,
            RecordData::Course(_) => RecordKind::CourseList,
            RecordData::Admission(_) => RecordKind::AdmissionInfo,
            RecordData::Placement(_) => RecordKind::PlacementStats,
        }
    }

    /// Returns the record's title, when the kind has one.
    ///
    /// Courses and overviews are titled; admission and placement records
    /// are single per-page summaries without a natural title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match &self.data {
            RecordData::Overview(o) => Some(&o.name),
            RecordData::Course(c) => Some(&c.name),
            RecordData::Admission(_) | RecordData::Placement(_) => None,
        }
    }

    /// Returns the normalized dedup key (case-folded, trimmed title).
    ///
    /// Records without a title have no dedup key and are never dropped by
    /// deduplication.
    #[must_use]
    pub fn dedup_key(&self) -> Option<String> {
        self.title().map(crate::extract::normalize_title)
    }
}

/// Outcome of one requested section of one detail URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SectionOutcome {
    /// The section page was fetched and run through the pipeline.
    ///
    /// An empty list is a valid outcome: zero records means no strategy
    /// matched, not that anything failed.
    Extracted(Vec<ExtractedRecord>),
    /// The section page could not be fetched.
    Failed(FetchError),
}

impl SectionOutcome {
    /// Returns true if the section was fetched (even if it yielded nothing).
    #[must_use]
    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted(_))
    }
}

/// Aggregate result for one detail URL.
///
/// Created at scheduling time and frozen once every requested section has
/// completed or failed. The `sections` map contains exactly the requested
/// section names - never a key that was not asked for, and never a missing
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollegeRecord {
    /// The detail URL that identifies this college.
    pub url: String,
    /// College name from the overview extraction, or `Unknown`.
    pub name: String,
    /// Overview payload when the main page yielded one.
    pub overview: Option<OverviewData>,
    /// Per-section outcomes, keyed by requested section name.
    pub sections: BTreeMap<String, SectionOutcome>,
    /// Every fetch failure encountered while building this record.
    pub errors: Vec<FetchError>,
}

impl CollegeRecord {
    /// Creates an empty record for a detail URL, to be filled by the join.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: "Unknown".to_string(),
            overview: None,
            sections: BTreeMap::new(),
            errors: Vec::new(),
        }
    }
}

/// How a run ended, distinguishing "found nothing to visit" from
/// "visited pages".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RunOutcome {
    /// Discovery found zero detail URLs; no detail pages were visited.
    NoDetailPages,
    /// Discovery found detail URLs and the detail wave ran.
    Completed {
        /// Number of unique detail URLs that were scheduled.
        discovered: usize,
    },
}

/// Final output of a scheduler run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeReport {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// One record per completed detail URL.
    pub records: Vec<CollegeRecord>,
    /// Every fetch failure from every stage.
    pub errors: Vec<FetchError>,
}
