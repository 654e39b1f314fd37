//! CLI entry point for the prospectus scraper.

use std::io::{self, IsTerminal, Read};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use prospectus_core::{LinkRule, ScrapeConfig, TaskScheduler};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Arguments come first so --help and --version exit before any logging.
    let args = Args::parse();

    // RUST_LOG, when set, overrides the flags; otherwise -q means
    // errors only and each -v raises the level from the info default.
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Prospectus starting");

    // Read listing URLs: from positional args or stdin
    let listing_urls = if args.urls.is_empty() {
        if io::stdin().is_terminal() {
            info!("No input provided. Pipe listing URLs via stdin or pass as arguments.");
            info!("Example: prospectus https://example.com/college-ranking");
            return Ok(());
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(ToString::to_string)
            .collect()
    } else {
        args.urls.clone()
    };

    if listing_urls.is_empty() {
        info!("No listing URLs found in input");
        return Ok(());
    }
    info!(listings = listing_urls.len(), "Parsed input");

    let config = ScrapeConfig {
        listing_urls,
        per_url_limit: usize::from(args.per_listing_limit),
        max_detail_urls: usize::from(args.max_colleges),
        listing_concurrency: usize::from(args.listing_concurrency),
        detail_concurrency: usize::from(args.concurrency),
        section_concurrency: usize::from(args.section_concurrency),
        min_delay: Duration::from_millis(args.rate_limit),
        max_attempts: u32::from(args.max_attempts),
        min_body_bytes: args.min_body_bytes,
        link_rule: LinkRule {
            host_filter: args.host_filter.clone(),
            path_keyword: args.link_keyword.clone(),
        },
        ..ScrapeConfig::default()
    };

    let scheduler = TaskScheduler::from_config(config).context("invalid configuration")?;

    // Ctrl-C requests a graceful drain: in-flight colleges finish, no new
    // ones start, and the partial report is still written.
    let cancel = scheduler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; draining in-flight work");
            cancel.cancel();
        }
    });

    // Progress bar, polled off the shared counters. Skipped in quiet mode
    // and when stderr is not a terminal.
    let progress = scheduler.progress();
    let bar_handle = if args.quiet || !io::stderr().is_terminal() {
        None
    } else {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} colleges",
            )?
            .progress_chars("=> "),
        );
        let poll_bar = bar.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(200));
            loop {
                interval.tick().await;
                let total = progress.total();
                if total > 0 {
                    poll_bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
                    poll_bar.set_length(total as u64);
                    poll_bar.set_position(progress.completed() as u64);
                }
            }
        });
        Some((bar, handle))
    };

    let report = scheduler.run().await?;

    if let Some((bar, handle)) = bar_handle {
        handle.abort();
        bar.finish_and_clear();
    }

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }

    info!(
        colleges = report.records.len(),
        errors = report.errors.len(),
        "Scrape complete"
    );

    Ok(())
}
