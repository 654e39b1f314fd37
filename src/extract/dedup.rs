//! Title-based deduplication of extracted records.
//!
//! Runs after the winning strategy: records whose normalized title repeats
//! or falls below the minimum length are dropped, first-seen order is
//! preserved, and records without a dedup key pass through untouched.
//! The operation is idempotent.

use std::collections::HashSet;

use crate::record::ExtractedRecord;

/// Normalizes a title for dedup comparison: trimmed, case-folded, with
/// internal whitespace collapsed.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Deduplicates records by normalized title, preserving first-seen order.
///
/// Titles shorter than `min_title_len` are dropped outright; records
/// without a title (admission/placement summaries) are always kept.
#[must_use]
pub fn dedup_records(records: Vec<ExtractedRecord>, min_title_len: usize) -> Vec<ExtractedRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        match record.dedup_key() {
            Some(key) => {
                if key.chars().count() < min_title_len {
                    continue;
                }
                if seen.insert(key) {
                    out.push(record);
                }
            }
            None => out.push(record),
        }
    }

    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::record::{AdmissionData, CourseData, RecordData, SourceStrategy};

    fn course(name: &str) -> ExtractedRecord {
        ExtractedRecord::new(
            SourceStrategy::Table,
            RecordData::Course(CourseData {
                name: name.to_string(),
                fees: None,
                duration: None,
                seats: None,
            }),
        )
    }

    fn admission() -> ExtractedRecord {
        ExtractedRecord::new(
            SourceStrategy::FreeText,
            RecordData::Admission(AdmissionData {
                entrance_exams: vec![],
                application_fee: None,
            }),
        )
    }

    #[test]
    fn test_normalize_title_folds_case_and_whitespace() {
        assert_eq!(normalize_title("  B.Tech   CSE "), "b.tech cse");
        assert_eq!(normalize_title("MBA"), "mba");
    }

    #[test]
    fn test_dedup_drops_repeated_titles_keeps_first() {
        let records = vec![
            course("B.Tech CSE"),
            course("b.tech  cse"),
            course("MBA Finance"),
        ];
        let deduped = dedup_records(records, 3);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title().unwrap(), "B.Tech CSE");
        assert_eq!(deduped[1].title().unwrap(), "MBA Finance");
    }

    #[test]
    fn test_dedup_drops_titles_below_minimum_length() {
        let records = vec![course("AB"), course("B.Tech CSE")];
        let deduped = dedup_records(records, 3);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].title().unwrap(), "B.Tech CSE");
    }

    #[test]
    fn test_dedup_passes_untitled_records_through() {
        let records = vec![admission(), admission()];
        // Untitled records have no dedup key; both are kept.
        assert_eq!(dedup_records(records, 3).len(), 2);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let records = vec![
            course("B.Tech CSE"),
            course("B.Tech CSE"),
            course("MBA Finance"),
            admission(),
        ];
        let once = dedup_records(records, 3);
        let twice = dedup_records(once.clone(), 3);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dedup_preserves_input_order() {
        let records = vec![course("MBA Finance"), course("B.Tech CSE")];
        let deduped = dedup_records(records, 3);
        assert_eq!(deduped[0].title().unwrap(), "MBA Finance");
        assert_eq!(deduped[1].title().unwrap(), "B.Tech CSE");
    }
}
