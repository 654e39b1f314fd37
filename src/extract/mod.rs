//! HTML extraction: strategies, rules, dedup, and link discovery.
//!
//! The public surface is [`ExtractionPipeline`] plus the rule and link
//! types callers configure it with. Individual strategies are exposed for
//! direct testing but most callers go through the pipeline.

mod dedup;
mod fields;
mod links;
mod pipeline;
mod rules;
pub mod strategies;

pub use dedup::{dedup_records, normalize_title};
pub use links::{LinkRule, canonical_url, discover_detail_links};
pub use pipeline::{DEFAULT_MAX_RECORDS, DEFAULT_MIN_TITLE_LEN, ExtractionPipeline};
pub use rules::{FieldPatterns, KeywordSet, RuleSet};
