//! Crawler module for the feed and comment listings
//!
//! This module contains the crawling logic, including:
//! - The generic pagination loop with rate-limit retries
//! - The feed (offset cursor) and comment (page number) strategies
//! - Injectable waiting between requests
//! - The `run_*` entry points used by the CLI

mod comments;
mod feed;
mod pacer;
mod pagination;

pub use comments::{resolve_input, CommentCrawler, CommentReport, CommentStrategy};
pub use feed::{parse_feed_items, FeedCrawler, FeedReport, FeedStrategy};
pub use pacer::{Sleeper, TokioSleeper};
pub use pagination::{Advance, PageStrategy, PaginationOutcome, Paginator, StopReason};

use crate::api::{login, ApiClient, Credentials};
use crate::config::Config;
use crate::Result;
use std::path::Path;

/// Runs a complete feed crawl
///
/// This is the entry point behind `posts`. It will:
/// 1. Log in with the given credentials
/// 2. Page through the feed from the configured start offset
/// 3. Append every page to today's flow items CSV
/// 4. Record the CSV path in the run manifest
///
/// # Example
///
/// ```no_run
/// use zfrontier_crawler::{run_posts, Config, Credentials};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("13800000000", "secret");
/// let report = run_posts(&Config::default(), &credentials).await?;
/// println!("{} rows in {}", report.items, report.csv_path.display());
/// # Ok(())
/// # }
/// ```
pub async fn run_posts(config: &Config, credentials: &Credentials) -> Result<FeedReport> {
    let session = login(&config.api, credentials).await?;
    let api = ApiClient::new(session, config.api.clone())?;

    FeedCrawler::new(&api, config, &TokioSleeper).run().await
}

/// Runs a complete comment crawl
///
/// The input CSV is resolved before logging in, so a missing input fails
/// with `CrawlError::InputNotFound` without touching the network.
pub async fn run_comments(
    config: &Config,
    credentials: &Credentials,
    input: Option<&Path>,
) -> Result<CommentReport> {
    let input = resolve_input(input, &config.output)?;

    let session = login(&config.api, credentials).await?;
    let api = ApiClient::new(session, config.api.clone())?;

    CommentCrawler::new(&api, config, &TokioSleeper)
        .run(&input)
        .await
}
