//! Field sub-extractors.
//!
//! Each function is a total function over text: it returns a normalized
//! value or `None`, never an error. Absence of a match is a valid outcome,
//! not a failure.

use super::rules::{FieldPatterns, KeywordSet};

/// Extracts a fee string, e.g. `₹ 2,50,000`.
#[must_use]
pub fn fee(patterns: &FieldPatterns, text: &str) -> Option<String> {
    patterns.fee.find(text).map(|m| m.as_str().to_string())
}

/// Extracts a course duration, normalized to `N Years`.
#[must_use]
pub fn duration(patterns: &FieldPatterns, text: &str) -> Option<String> {
    patterns
        .duration
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| format!("{} Years", m.as_str()))
}

/// Extracts a seat/intake count.
#[must_use]
pub fn seats(patterns: &FieldPatterns, text: &str) -> Option<String> {
    patterns
        .seats
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extracts a placement rate, normalized to `N%`.
#[must_use]
pub fn placement_rate(patterns: &FieldPatterns, text: &str) -> Option<String> {
    patterns
        .placement_rate
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| format!("{}%", m.as_str()))
}

/// Extracts an average package, normalized to `₹N LPA`.
#[must_use]
pub fn average_package(patterns: &FieldPatterns, text: &str) -> Option<String> {
    patterns
        .average_package
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| format!("₹{} LPA", m.as_str()))
}

/// Extracts a four-digit establishment year.
#[must_use]
pub fn established_year(patterns: &FieldPatterns, text: &str) -> Option<String> {
    patterns
        .established_year
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extracts a location string, trying each location pattern in order.
#[must_use]
pub fn location(patterns: &FieldPatterns, text: &str) -> Option<String> {
    patterns.location.iter().find_map(|p| {
        p.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Extracts an application fee phrase.
#[must_use]
pub fn application_fee(patterns: &FieldPatterns, text: &str) -> Option<String> {
    patterns
        .application_fee
        .find(text)
        .map(|m| m.as_str().to_string())
}

/// Collects the keywords (exams, recruiters) present in the text,
/// preserving rule-table order. Matching is case-insensitive and
/// boundary-anchored, so a keyword never fires inside another word.
#[must_use]
pub fn keywords_present(keywords: &KeywordSet, text: &str) -> Vec<String> {
    keywords.matches(text)
}
