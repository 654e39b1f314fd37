//! Extraction strategies, one heuristic per function.
//!
//! Each strategy is a pure function `(&Html, &RuleSet) -> Vec<ExtractedRecord>`
//! that returns an empty vector rather than failing when the page layout
//! does not match. The pipeline composes them in a fixed priority order and
//! stops at the first non-empty result, so each one stays independently
//! unit-testable.

use scraper::{ElementRef, Html, Selector};

use super::fields;
use super::rules::RuleSet;
use crate::record::{
    AdmissionData, CourseData, ExtractedRecord, OverviewData, PlacementData, RecordData,
    SourceStrategy,
};

/// One extraction heuristic.
pub type Strategy = fn(&Html, &RuleSet) -> Vec<ExtractedRecord>;

/// Collects an element's text with whitespace collapsed.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collects the whole page's text with whitespace collapsed.
fn page_text(html: &Html) -> String {
    html.root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}

fn course_record(strategy: SourceStrategy, rules: &RuleSet, name: String, text: &str) -> ExtractedRecord {
    ExtractedRecord::new(
        strategy,
        RecordData::Course(CourseData {
            name,
            fees: fields::fee(&rules.fields, text),
            duration: fields::duration(&rules.fields, text),
            seats: fields::seats(&rules.fields, text),
        }),
    )
}

// ==================== CourseList ====================

/// Structured-table strategy: walk every table, skip the header row, and
/// treat the first cell containing a degree keyword as the course title.
/// The remaining cell text is scanned with the field patterns.
#[must_use]
pub fn course_table(html: &Html, rules: &RuleSet) -> Vec<ExtractedRecord> {
    let (Some(table_sel), Some(row_sel), Some(cell_sel)) =
        (parse("table"), parse("tr"), parse("td, th"))
    else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for table in html.select(&table_sel) {
        for row in table.select(&row_sel).skip(1) {
            let cells: Vec<String> = row.select(&cell_sel).map(element_text).collect();
            if cells.len() < 2 {
                continue;
            }
            let Some(name) = cells.iter().find(|c| rules.is_degree_title(c)) else {
                continue;
            };
            let row_text = cells.join(" ");
            out.push(course_record(
                SourceStrategy::Table,
                rules,
                name.clone(),
                &row_text,
            ));
        }
    }
    out
}

/// Structured-container strategy: repeated card/list-item elements, with a
/// title element inside each one.
#[must_use]
pub fn course_containers(html: &Html, rules: &RuleSet) -> Vec<ExtractedRecord> {
    let Some(container_sel) = parse(&rules.container_selectors) else {
        return Vec::new();
    };
    let Some(title_sel) = parse(&rules.container_title_selectors) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for container in html.select(&container_sel) {
        let title = container
            .select(&title_sel)
            .map(element_text)
            .find(|t| rules.is_degree_title(t));
        let Some(name) = title else { continue };
        let text = element_text(container);
        out.push(course_record(SourceStrategy::Container, rules, name, &text));
    }
    out
}

/// Free-text pattern strategy: scan the whole page text with the course
/// patterns, capped per pattern to bound output size.
#[must_use]
pub fn course_freetext(html: &Html, rules: &RuleSet) -> Vec<ExtractedRecord> {
    let text = page_text(html);
    let mut out = Vec::new();
    for pattern in &rules.course_patterns {
        for m in pattern.find_iter(&text).take(rules.max_freetext_matches) {
            out.push(ExtractedRecord::new(
                SourceStrategy::FreeText,
                RecordData::Course(CourseData {
                    name: m.as_str().trim().to_string(),
                    fees: None,
                    duration: None,
                    seats: None,
                }),
            ));
        }
    }
    out
}

// ==================== Overview ====================

fn overview_from(name: String, strategy: SourceStrategy, html: &Html, rules: &RuleSet) -> Vec<ExtractedRecord> {
    let text = page_text(html);
    vec![ExtractedRecord::new(
        strategy,
        RecordData::Overview(OverviewData {
            name,
            location: fields::location(&rules.fields, &text),
            established: fields::established_year(&rules.fields, &text),
        }),
    )]
}

/// Heading strategy: the first name-selector match that is long enough and
/// not site branding.
#[must_use]
pub fn overview_heading(html: &Html, rules: &RuleSet) -> Vec<ExtractedRecord> {
    let Some(name_sel) = parse(&rules.name_selectors) else {
        return Vec::new();
    };
    let name = html
        .select(&name_sel)
        .map(element_text)
        .find(|t| t.len() > rules.min_name_len && !rules.is_blocked_name(t));
    match name {
        Some(name) => overview_from(name, SourceStrategy::Container, html, rules),
        None => Vec::new(),
    }
}

/// Fallback strategy: the document `<title>`, trimmed of separator-delimited
/// site branding.
#[must_use]
pub fn overview_title(html: &Html, rules: &RuleSet) -> Vec<ExtractedRecord> {
    let Some(title_sel) = parse("title") else {
        return Vec::new();
    };
    let name = html
        .select(&title_sel)
        .map(element_text)
        .filter_map(|t| {
            t.split(['|', '-'])
                .next()
                .map(|head| head.trim().to_string())
        })
        .find(|t| t.len() > rules.min_name_len && !rules.is_blocked_name(t));
    match name {
        Some(name) => overview_from(name, SourceStrategy::FreeText, html, rules),
        None => Vec::new(),
    }
}

// ==================== AdmissionInfo ====================

fn admission_from(strategy: SourceStrategy, rules: &RuleSet, text: &str) -> Vec<ExtractedRecord> {
    let entrance_exams = fields::keywords_present(&rules.exam_keywords, text);
    let application_fee = fields::application_fee(&rules.fields, text);
    if entrance_exams.is_empty() && application_fee.is_none() {
        return Vec::new();
    }
    vec![ExtractedRecord::new(
        strategy,
        RecordData::Admission(AdmissionData {
            entrance_exams,
            application_fee,
        }),
    )]
}

/// Table strategy: the first table mentioning an exam or an application fee.
#[must_use]
pub fn admission_table(html: &Html, rules: &RuleSet) -> Vec<ExtractedRecord> {
    let Some(table_sel) = parse("table") else {
        return Vec::new();
    };
    for table in html.select(&table_sel) {
        let text = element_text(table);
        let records = admission_from(SourceStrategy::Table, rules, &text);
        if !records.is_empty() {
            return records;
        }
    }
    Vec::new()
}

/// Free-text strategy over the full page.
#[must_use]
pub fn admission_freetext(html: &Html, rules: &RuleSet) -> Vec<ExtractedRecord> {
    admission_from(SourceStrategy::FreeText, rules, &page_text(html))
}

// ==================== PlacementStats ====================

fn placement_from(strategy: SourceStrategy, rules: &RuleSet, text: &str) -> Vec<ExtractedRecord> {
    let placement_rate = fields::placement_rate(&rules.fields, text);
    let average_package = fields::average_package(&rules.fields, text);
    let top_recruiters = fields::keywords_present(&rules.recruiter_keywords, text);
    if placement_rate.is_none() && average_package.is_none() && top_recruiters.is_empty() {
        return Vec::new();
    }
    vec![ExtractedRecord::new(
        strategy,
        RecordData::Placement(PlacementData {
            placement_rate,
            average_package,
            top_recruiters,
        }),
    )]
}

/// Table strategy: the first table yielding any placement field.
#[must_use]
pub fn placement_table(html: &Html, rules: &RuleSet) -> Vec<ExtractedRecord> {
    let Some(table_sel) = parse("table") else {
        return Vec::new();
    };
    for table in html.select(&table_sel) {
        let text = element_text(table);
        let records = placement_from(SourceStrategy::Table, rules, &text);
        if !records.is_empty() {
            return records;
        }
    }
    Vec::new()
}

/// Free-text strategy over the full page.
#[must_use]
pub fn placement_freetext(html: &Html, rules: &RuleSet) -> Vec<ExtractedRecord> {
    placement_from(SourceStrategy::FreeText, rules, &page_text(html))
}
