//! Detail-link discovery from listing documents.
//!
//! Wave 1 of the scheduler runs every listing page through
//! [`discover_detail_links`] to find candidate detail URLs. Which links
//! qualify is controlled by a [`LinkRule`], not hard-coded, so the engine
//! works against any site hierarchy with the same shape.

use scraper::{Html, Selector};
use url::Url;

use crate::fetch::Document;

/// Filter deciding which anchors on a listing page are detail links.
#[derive(Debug, Clone, Default)]
pub struct LinkRule {
    /// Substring the link's host must contain (e.g. the site's domain).
    /// `None` accepts any host.
    pub host_filter: Option<String>,
    /// Substring the link's path must contain (e.g. `university`).
    /// `None` accepts any path.
    pub path_keyword: Option<String>,
}

impl LinkRule {
    /// Returns true if the resolved URL passes this rule.
    #[must_use]
    fn matches(&self, url: &Url) -> bool {
        if let Some(host_filter) = &self.host_filter {
            let Some(host) = url.host_str() else {
                return false;
            };
            if !host.to_lowercase().contains(&host_filter.to_lowercase()) {
                return false;
            }
        }
        if let Some(keyword) = &self.path_keyword {
            if !url.path().to_lowercase().contains(&keyword.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Strips query and fragment so detail URLs compare equal across listings.
#[must_use]
pub fn canonical_url(url: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    parsed.set_query(None);
    parsed.set_fragment(None);
    Some(parsed.to_string())
}

/// Extracts up to `limit` canonical detail URLs from a listing document.
///
/// Relative hrefs are resolved against the document's final URL. Links are
/// deduplicated in first-seen order; non-HTTP(S) schemes and the listing
/// page itself are skipped.
#[must_use]
pub fn discover_detail_links(doc: &Document, rule: &LinkRule, limit: usize) -> Vec<String> {
    let Ok(anchor_sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let Ok(base) = Url::parse(&doc.url) else {
        return Vec::new();
    };
    let self_url = canonical_url(&doc.url);

    let html = Html::parse_document(&doc.body);
    let mut out: Vec<String> = Vec::new();

    for anchor in html.select(&anchor_sel) {
        if out.len() >= limit {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(mut resolved) = base.join(href) else {
            continue;
        };
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }
        if !rule.matches(&resolved) {
            continue;
        }
        resolved.set_query(None);
        resolved.set_fragment(None);
        let canonical = resolved.to_string();
        if Some(&canonical) == self_url.as_ref() {
            continue;
        }
        if !out.contains(&canonical) {
            out.push(canonical);
        }
    }

    out
}
