//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use prospectus_core::DEFAULT_MAX_ATTEMPTS;

/// Scrape college listings into structured course, admission, and
/// placement data.
///
/// Prospectus takes one or more listing URLs, discovers college detail
/// pages, fetches each college's sections politely and concurrently, and
/// writes a single JSON report.
#[derive(Parser, Debug)]
#[command(name = "prospectus")]
#[command(author, version, about)]
pub struct Args {
    /// Listing URLs to crawl (read from stdin when omitted)
    pub urls: Vec<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Maximum colleges processed across all listings (1-500)
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..=500))]
    pub max_colleges: u16,

    /// Maximum detail links taken from one listing page (1-500)
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..=500))]
    pub per_listing_limit: u16,

    /// Maximum concurrent college workers (1-100)
    #[arg(short = 'c', long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Maximum concurrent listing fetches (1-100)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub listing_concurrency: u8,

    /// Maximum concurrent section fetches per college (1-100)
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub section_concurrency: u8,

    /// Maximum attempts per URL including the first (1-10)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_ATTEMPTS as u8, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub max_attempts: u8,

    /// Minimum delay between requests to same host in milliseconds (0 to disable, max 60000)
    #[arg(short = 'l', long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub rate_limit: u64,

    /// Reject response bodies smaller than this many bytes (0 to disable)
    #[arg(long, default_value_t = 1000)]
    pub min_body_bytes: usize,

    /// Substring detail-link hosts must contain
    #[arg(long)]
    pub host_filter: Option<String>,

    /// Substring detail-link paths must contain
    #[arg(long)]
    pub link_keyword: Option<String>,

    /// Write the JSON report to this file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}
