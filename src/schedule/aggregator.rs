//! Thread-safe collection of finished records and run-level errors.
//!
//! Workers push completed [`CollegeRecord`]s and stray fetch failures here;
//! the scheduler takes a consistent snapshot at the end of the run. Records
//! are appended in completion order - callers that need a stable order sort
//! the snapshot themselves.

use std::sync::Mutex;

use tracing::warn;

use crate::fetch::FetchError;
use crate::record::{CollegeRecord, RunOutcome, ScrapeReport};

/// Collects per-college records and fetch failures across worker tasks.
///
/// Uses a std `Mutex`: both operations are short appends with no await
/// points while the lock is held.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    records: Mutex<Vec<CollegeRecord>>,
    errors: Mutex<Vec<FetchError>>,
}

impl ResultAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one finished college record.
    pub fn add(&self, record: CollegeRecord) {
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => {
                warn!("aggregator record lock poisoned; recovering");
                poisoned.into_inner().push(record);
            }
        }
    }

    /// Appends one fetch failure to the run-level error list.
    pub fn add_error(&self, error: FetchError) {
        match self.errors.lock() {
            Ok(mut errors) => errors.push(error),
            Err(poisoned) => {
                warn!("aggregator error lock poisoned; recovering");
                poisoned.into_inner().push(error);
            }
        }
    }

    /// Number of records collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().map_or_else(
            |poisoned| poisoned.into_inner().len(),
            |records| records.len(),
        )
    }

    /// True if no records have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a point-in-time copy of the collected records and errors.
    ///
    /// Each list is internally consistent; a record mid-add appears in
    /// neither or fully, never partially.
    #[must_use]
    pub fn snapshot(&self) -> (Vec<CollegeRecord>, Vec<FetchError>) {
        let records = self.records.lock().map_or_else(
            |poisoned| poisoned.into_inner().clone(),
            |records| records.clone(),
        );
        let errors = self.errors.lock().map_or_else(
            |poisoned| poisoned.into_inner().clone(),
            |errors| errors.clone(),
        );
        (records, errors)
    }

    /// Drains everything collected so far into a final report.
    ///
    /// The aggregator is shared via `Arc` across workers, so the drain takes
    /// `&self`; it runs after the scheduler has joined all tasks.
    pub fn drain_report(&self, outcome: RunOutcome) -> ScrapeReport {
        let records = self.records.lock().map_or_else(
            |poisoned| std::mem::take(&mut *poisoned.into_inner()),
            |mut records| std::mem::take(&mut *records),
        );
        let errors = self.errors.lock().map_or_else(
            |poisoned| std::mem::take(&mut *poisoned.into_inner()),
            |mut errors| std::mem::take(&mut *errors),
        );
        ScrapeReport {
            outcome,
            records,
            errors,
        }
    }
}
