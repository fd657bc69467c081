//! Generic paginated fetch loop
//!
//! Both listings are walked by the same loop; a [`PageStrategy`] supplies the
//! endpoint, the form for a cursor and the rule for moving to the next
//! cursor. The loop itself handles the outcomes of each request:
//!
//! | Response | Action |
//! |----------|--------|
//! | Transport failure | Stop, nothing yielded |
//! | Rate limited | Wait, then repeat the same cursor |
//! | Application error | Stop, nothing yielded |
//! | Valid | Yield the `list`, then advance or stop |
//!
//! Failures end the loop with a [`StopReason`] rather than an error; only
//! errors raised by the page consumer (or a broken endpoint configuration)
//! escape as `Err`.

use crate::api::{ApiClient, ResponseClass};
use crate::config::CrawlerConfig;
use crate::crawler::pacer::Sleeper;
use crate::Result;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// What the loop should do after a valid page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance<C> {
    /// Request this cursor next
    Next(C),

    /// No more data
    Done,
}

/// Listing-specific parts of the pagination loop
pub trait PageStrategy {
    type Cursor: Clone + fmt::Debug;

    /// Describes the request for `cursor` in log lines, e.g. "feed at offset '5000'"
    fn describe(&self, cursor: &Self::Cursor) -> String;

    /// Endpoint path, relative to the API base URL
    fn endpoint(&self) -> &'static str;

    /// Cursor of the first request
    fn first_cursor(&self) -> Self::Cursor;

    /// Listing-specific form fields for `cursor` (signing fields are added
    /// by the client)
    fn form(&self, cursor: &Self::Cursor) -> Vec<(&'static str, String)>;

    /// Decides where to go after a valid page
    ///
    /// `data` is the envelope's `data` object with its `list` already
    /// removed; `item_count` is the length that list had.
    fn advance(&self, cursor: &Self::Cursor, data: &Value, item_count: usize)
        -> Advance<Self::Cursor>;
}

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The strategy reported no more data
    Exhausted,

    /// A request got no response or a non-200 status
    TransportFailure,

    /// A response had an unexpected or failed envelope
    ApplicationError,
}

/// Summary of one pagination run
#[derive(Debug, Clone)]
pub struct PaginationOutcome<C> {
    pub stop: StopReason,

    /// Cursor of the last request sent
    pub last_cursor: C,

    /// Requests sent, including rate-limited retries
    pub requests: u64,

    /// Non-empty pages handed to the consumer
    pub pages: u64,

    /// Items handed to the consumer
    pub items: u64,

    pub rate_limit_waits: u64,
}

impl<C> PaginationOutcome<C> {
    fn new(cursor: C) -> Self {
        Self {
            stop: StopReason::Exhausted,
            last_cursor: cursor,
            requests: 0,
            pages: 0,
            items: 0,
            rate_limit_waits: 0,
        }
    }

    fn stopped(mut self, reason: StopReason) -> Self {
        self.stop = reason;
        self
    }

    /// True if the listing was walked to its end
    pub fn is_complete(&self) -> bool {
        self.stop == StopReason::Exhausted
    }
}

/// Drives a [`PageStrategy`] against the API, one request at a time
pub struct Paginator<'a> {
    api: &'a ApiClient,
    sleeper: &'a dyn Sleeper,
    page_delay: Duration,
    rate_limit_wait: Duration,
}

impl<'a> Paginator<'a> {
    pub fn new(api: &'a ApiClient, sleeper: &'a dyn Sleeper, config: &CrawlerConfig) -> Self {
        Self {
            api,
            sleeper,
            page_delay: config.page_delay(),
            rate_limit_wait: config.rate_limit_wait(),
        }
    }

    /// Walks the listing until the strategy or a failure stops it
    ///
    /// Each non-empty page is passed to `on_page` before the next request is
    /// sent.
    pub async fn run<S, F>(&self, strategy: &S, mut on_page: F) -> Result<PaginationOutcome<S::Cursor>>
    where
        S: PageStrategy,
        F: FnMut(Vec<Value>) -> Result<()>,
    {
        let mut outcome = PaginationOutcome::new(strategy.first_cursor());

        loop {
            let cursor = outcome.last_cursor.clone();
            tracing::info!("Fetching {}", strategy.describe(&cursor));

            outcome.requests += 1;
            let class = self
                .api
                .post_listing(strategy.endpoint(), &strategy.form(&cursor))
                .await?;

            let mut data = match class {
                ResponseClass::Valid(data) => data,
                ResponseClass::RateLimited => {
                    outcome.rate_limit_waits += 1;
                    tracing::warn!(
                        "Rate limited. Waiting for {} seconds before retrying {}",
                        self.rate_limit_wait.as_secs(),
                        strategy.describe(&cursor)
                    );
                    self.sleeper.sleep(self.rate_limit_wait).await;
                    continue;
                }
                ResponseClass::TransportFailure { status } => {
                    match status {
                        Some(code) => tracing::error!("Request failed with status code: {}", code),
                        None => tracing::error!("Request failed before a response arrived"),
                    }
                    return Ok(outcome.stopped(StopReason::TransportFailure));
                }
                ResponseClass::ApplicationError { ok, msg } => {
                    tracing::error!("Invalid response format (ok: {:?}, msg: {:?})", ok, msg);
                    return Ok(outcome.stopped(StopReason::ApplicationError));
                }
            };

            let items = match data.get_mut("list").map(Value::take) {
                Some(Value::Array(items)) => items,
                _ => {
                    tracing::error!("Invalid response format: data has no list");
                    return Ok(outcome.stopped(StopReason::ApplicationError));
                }
            };

            let step = strategy.advance(&cursor, &data, items.len());

            if !items.is_empty() {
                outcome.pages += 1;
                outcome.items += items.len() as u64;
                on_page(items)?;
            }

            match step {
                Advance::Done => return Ok(outcome),
                Advance::Next(next) => {
                    self.sleeper.sleep(self.page_delay).await;
                    outcome.last_cursor = next;
                }
            }
        }
    }
}
