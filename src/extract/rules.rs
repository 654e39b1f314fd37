//! Pluggable extraction rule table.
//!
//! Every keyword list, CSS selector, and field pattern the strategies use
//! lives here, so new fields or site layouts can be added without touching
//! the scheduler or the gate. [`RuleSet::default`] carries the defaults for
//! the college-listing site this tool was built against.

use regex::Regex;

/// Keywords matched case-insensitively on word boundaries.
///
/// Boundary anchoring keeps short keywords from firing inside unrelated
/// words ("CAT" in "Application", "MAT" in "information").
#[derive(Debug, Clone)]
pub struct KeywordSet {
    entries: Vec<(String, Regex)>,
}

impl KeywordSet {
    /// Compiles one boundary-anchored pattern per keyword.
    // Escaped literals always compile; a failure here is a programming
    // error, not a runtime condition.
    #[allow(clippy::expect_used)]
    #[must_use]
    pub fn new(keywords: &[&str]) -> Self {
        let entries = keywords
            .iter()
            .map(|keyword| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
                let re = Regex::new(&pattern).expect("escaped keyword pattern must compile");
                ((*keyword).to_string(), re)
            })
            .collect();
        Self { entries }
    }

    /// Returns the keywords present in the text, in declaration order.
    #[must_use]
    pub fn matches(&self, text: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(keyword, _)| keyword.clone())
            .collect()
    }

    /// Returns true if the set holds no keywords.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compiled field patterns, one per extractable field.
#[derive(Debug, Clone)]
pub struct FieldPatterns {
    /// Monetary amount, e.g. `₹ 2,50,000` or `₹1.2 lakh`.
    pub fee: Regex,
    /// Course duration in years.
    pub duration: Regex,
    /// Seat/intake count.
    pub seats: Regex,
    /// Placement percentage near a "placement"/"placed" mention.
    pub placement_rate: Regex,
    /// Average package amount.
    pub average_package: Regex,
    /// Four-digit establishment year.
    pub established_year: Regex,
    /// Location candidates, tried in order.
    pub location: Vec<Regex>,
    /// Application fee phrase.
    pub application_fee: Regex,
}

/// The full rule table consumed by the extraction strategies.
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Substrings that mark a cell or line as a degree programme title.
    pub degree_keywords: Vec<String>,
    /// Entrance exam names scanned for in admission pages.
    pub exam_keywords: KeywordSet,
    /// Recruiter names scanned for in placement pages.
    pub recruiter_keywords: KeywordSet,
    /// Selectors tried for the college name, in priority order.
    pub name_selectors: String,
    /// Lowercased substrings that disqualify a name candidate
    /// (site branding picked up from shared page chrome).
    pub name_blocklist: Vec<String>,
    /// Selectors for repeated card/list-item course containers.
    pub container_selectors: String,
    /// Selectors for a title element inside a course container.
    pub container_title_selectors: String,
    /// Minimum length for a name/title candidate to be believable.
    pub min_name_len: usize,
    /// Free-text course patterns, tried in order.
    pub course_patterns: Vec<Regex>,
    /// Cap on matches taken per free-text pattern.
    pub max_freetext_matches: usize,
    /// Per-field patterns.
    pub fields: FieldPatterns,
}

impl Default for RuleSet {
    // Patterns are static and known-valid; a failed compile here is a
    // programming error, not a runtime condition.
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        let re = |p: &str| Regex::new(p).expect("static rule pattern must compile");

        Self {
            degree_keywords: ["b.tech", "btech", "m.tech", "mtech", "mba", "mca", "m.sc", "msc",
                "b.sc", "bsc", "bca", "ph.d", "phd", "diploma", "b.e", "m.e"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exam_keywords: KeywordSet::new(&[
                "JEE", "GATE", "CAT", "MAT", "NEET", "JAM", "CLAT", "XAT", "BITSAT",
            ]),
            recruiter_keywords: KeywordSet::new(&[
                "Microsoft", "Google", "Amazon", "TCS", "Infosys", "Wipro", "Goldman Sachs",
                "Deloitte", "Accenture",
            ]),
            name_selectors: "h1, .college-name, .university-name, .main-heading".to_string(),
            name_blocklist: vec!["careers360".to_string()],
            container_selectors:
                ".card, .course-card, .course-item, .listing-block, li.course, .course-listing li"
                    .to_string(),
            container_title_selectors: "h2, h3, h4, h5, a, strong, b, .course-name".to_string(),
            min_name_len: 5,
            course_patterns: vec![re(
                r"(?i)\b(?:B\.?\s?Tech|M\.?\s?Tech|MBA|MCA|M\.?\s?Sc|B\.?\s?Sc|BCA|Ph\.?\s?D|Diploma)\b(?:\.?\s+(?:in|of)\s+[A-Za-z&][A-Za-z&\s]{2,50})?",
            )],
            max_freetext_matches: 10,
            fields: FieldPatterns {
                fee: re(r"(?i)₹\s*[\d,]+(?:\.\d+)?(?:\s*(?:lakh|crore|L))?"),
                duration: re(r"(?i)(\d+)\s*(?:year|yr)s?"),
                seats: re(r"(?i)(\d+)\s*(?:seat|intake)"),
                placement_rate: re(r"(?is)(\d+(?:\.\d+)?)\s*%.{0,60}?(?:placement|placed)"),
                average_package: re(
                    r"(?is)average.{0,60}?package.{0,60}?₹\s*([\d,]+(?:\.\d+)?)\s*(?:lakh|crore|LPA)",
                ),
                established_year: re(r"(?i)(?:established|founded)\D{0,40}(\d{4})"),
                location: vec![
                    re(r"(?:located in|address|Located in|Address)\D{0,20}([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*,\s*[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)"),
                    re(r"([A-Z][a-z]+,\s*[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)"),
                ],
                application_fee: re(r"(?i)application\s+fee[:\s]*₹\s*[\d,]+"),
            },
        }
    }
}

impl RuleSet {
    /// Returns true if the text looks like a degree programme title.
    #[must_use]
    pub fn is_degree_title(&self, text: &str) -> bool {
        if text.len() <= self.min_name_len {
            return false;
        }
        let lower = text.to_lowercase();
        self.degree_keywords.iter().any(|k| lower.contains(k))
    }

    /// Returns true if a name candidate is disqualified by the blocklist.
    #[must_use]
    pub fn is_blocked_name(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.name_blocklist.iter().any(|b| lower.contains(b))
    }
}
