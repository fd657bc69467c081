//! Waiting between requests
//!
//! All delays (between pages, between posts, after a rate limit) go through
//! [`Sleeper`] so tests can observe them without actually waiting.

use async_trait::async_trait;
use std::time::Duration;

/// Something that can block the crawl for a while
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tracing::debug!("Sleeping for {:?}", duration);
        tokio::time::sleep(duration).await;
    }
}
