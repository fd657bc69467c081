//! Feed crawler
//!
//! Walks the circle's flow listing from the newest entry backwards, following
//! the server-supplied `offset`, and appends each page to the dated flow items
//! CSV. The walk stops when the offset runs out or falls below the configured
//! floor, which bounds how far back one run goes.

use crate::api::{ApiClient, FLOW_LIST_PATH};
use crate::config::{Config, CrawlerConfig, FeedConfig};
use crate::crawler::pacer::Sleeper;
use crate::crawler::pagination::{Advance, PageStrategy, Paginator, StopReason};
use crate::model::FeedItem;
use crate::output::{FlowItemsCsv, RunManifest};
use crate::Result;
use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::path::PathBuf;

/// Offset-cursor strategy for the flow listing
#[derive(Debug, Clone)]
pub struct FeedStrategy {
    feed: FeedConfig,
    start_offset: String,
    min_offset: i64,
}

impl FeedStrategy {
    pub fn new(feed: &FeedConfig, crawler: &CrawlerConfig) -> Self {
        Self {
            feed: feed.clone(),
            start_offset: crawler.start_offset.clone(),
            min_offset: crawler.min_offset,
        }
    }
}

impl PageStrategy for FeedStrategy {
    type Cursor = String;

    fn describe(&self, offset: &String) -> String {
        if offset.is_empty() {
            "feed from the newest page".to_string()
        } else {
            format!("feed at offset '{}'", offset)
        }
    }

    fn endpoint(&self) -> &'static str {
        FLOW_LIST_PATH
    }

    fn first_cursor(&self) -> String {
        self.start_offset.clone()
    }

    fn form(&self, cursor: &String) -> Vec<(&'static str, String)> {
        vec![
            ("offset", cursor.clone()),
            ("cid", self.feed.cid.clone()),
            ("sortBy", self.feed.sort_by.clone()),
            ("tagIds[0]", self.feed.tag_id.clone()),
        ]
    }

    fn advance(&self, _cursor: &String, data: &Value, _item_count: usize) -> Advance<String> {
        let next = next_offset(data);
        tracing::info!("Next page offset: {}", next.as_deref().unwrap_or("<none>"));

        let Some(next) = next else {
            tracing::info!("No further offset, stopping");
            return Advance::Done;
        };

        match next.parse::<i64>() {
            Ok(offset) if offset < self.min_offset => {
                tracing::info!("Reached target offset {}, stopping", self.min_offset);
                Advance::Done
            }
            Ok(_) => Advance::Next(next),
            Err(_) => {
                tracing::debug!("Offset {} is not numeric, following it as is", next);
                Advance::Next(next)
            }
        }
    }
}

/// Reads the next cursor from a page's `data`
///
/// Absent, null, empty, `false` and zero offsets all mean "no more pages".
fn next_offset(data: &Value) -> Option<String> {
    match data.get("offset")? {
        Value::String(s) if s.is_empty() || s == "0" => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Converts listing entries to feed items, skipping malformed ones
///
/// # Returns
///
/// The parsed items and the number of entries skipped
pub fn parse_feed_items(values: &[Value]) -> (Vec<FeedItem>, u64) {
    let mut items = Vec::with_capacity(values.len());
    let mut skipped = 0;

    for value in values {
        match FeedItem::from_value(value) {
            Ok(item) => items.push(item),
            Err(e) => {
                skipped += 1;
                tracing::warn!("Skipping malformed feed entry: {}", e);
                tracing::debug!("Malformed entry: {}", value);
            }
        }
    }

    (items, skipped)
}

/// Result of a feed crawl
#[derive(Debug, Clone)]
pub struct FeedReport {
    /// CSV file the rows were appended to
    pub csv_path: PathBuf,

    pub stop: StopReason,

    /// Offset of the last request; pass it as the start offset to continue
    pub last_offset: String,

    pub pages: u64,

    /// Rows written to the CSV
    pub items: u64,

    /// Entries dropped because they were malformed
    pub skipped: u64,

    pub rate_limit_waits: u64,
}

/// Runs the feed listing into the flow items CSV
pub struct FeedCrawler<'a> {
    api: &'a ApiClient,
    config: &'a Config,
    sleeper: &'a dyn Sleeper,
}

impl<'a> FeedCrawler<'a> {
    pub fn new(api: &'a ApiClient, config: &'a Config, sleeper: &'a dyn Sleeper) -> Self {
        Self {
            api,
            config,
            sleeper,
        }
    }

    /// Crawls into today's flow items file
    pub async fn run(&self) -> Result<FeedReport> {
        self.run_on(Local::now().date_naive()).await
    }

    /// Crawls into the flow items file named after `date`
    ///
    /// The CSV header is written before the first request, so even a run that
    /// fetches nothing leaves a valid file. A manifest pointing at the file is
    /// written once the listing stops, whatever the reason.
    pub async fn run_on(&self, date: NaiveDate) -> Result<FeedReport> {
        let csv = FlowItemsCsv::open_dated(&self.config.output.data_dir, date)?;
        tracing::info!("Writing feed items to {}", csv.path().display());

        let strategy = FeedStrategy::new(&self.config.feed, &self.config.crawler);
        let paginator = Paginator::new(self.api, self.sleeper, &self.config.crawler);

        let mut written = 0u64;
        let mut skipped = 0u64;
        let outcome = paginator
            .run(&strategy, |values| {
                let (items, malformed) = parse_feed_items(&values);
                skipped += malformed;
                written += csv.append(&items)? as u64;
                tracing::debug!("Appended {} rows", items.len());
                Ok(())
            })
            .await?;

        if outcome.is_complete() {
            tracing::info!("Finished fetching all data");
        } else {
            tracing::warn!(
                "Feed crawl stopped early ({:?}); restart from offset '{}' to continue",
                outcome.stop,
                outcome.last_cursor
            );
        }

        let manifest = RunManifest::new(csv.path().to_path_buf(), outcome.pages, written);
        manifest.write(&self.config.output.manifest_path())?;

        tracing::info!(
            "Feed crawl wrote {} rows from {} pages in {} requests ({} skipped, {} rate-limit waits)",
            written,
            outcome.pages,
            outcome.requests,
            skipped,
            outcome.rate_limit_waits
        );

        Ok(FeedReport {
            csv_path: csv.path().to_path_buf(),
            stop: outcome.stop,
            last_offset: outcome.last_cursor,
            pages: outcome.pages,
            items: written,
            skipped,
            rate_limit_waits: outcome.rate_limit_waits,
        })
    }
}
