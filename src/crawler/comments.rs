//! Comment crawler
//!
//! For every post id in a flow items CSV, pages through the post's replies
//! oldest-first until a page comes back empty, then writes the whole thread
//! as one JSON document. A post whose listing fails is skipped without a
//! file; the crawler moves on to the next post.

use crate::api::{ApiClient, FLOW_REPLY_LIST_PATH};
use crate::config::{Config, OutputConfig};
use crate::crawler::pacer::Sleeper;
use crate::crawler::pagination::{Advance, PageStrategy, Paginator};
use crate::model::CommentDocument;
use crate::output::{
    find_latest_flow_items, is_valid_post_id, load_post_ids, write_comment_document, RunManifest,
};
use crate::{CrawlError, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Page-number strategy for one post's replies
#[derive(Debug, Clone)]
pub struct CommentStrategy {
    post_id: String,
    sort_by: String,
}

impl CommentStrategy {
    pub fn new(post_id: impl Into<String>, sort_by: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            sort_by: sort_by.into(),
        }
    }
}

impl PageStrategy for CommentStrategy {
    type Cursor = u32;

    fn describe(&self, page: &u32) -> String {
        format!("page {} of comments for post {}", page, self.post_id)
    }

    fn endpoint(&self) -> &'static str {
        FLOW_REPLY_LIST_PATH
    }

    fn first_cursor(&self) -> u32 {
        1
    }

    fn form(&self, page: &u32) -> Vec<(&'static str, String)> {
        vec![
            ("snap", "0".to_string()),
            ("id", self.post_id.clone()),
            ("sortBy", self.sort_by.clone()),
            ("unfold", "0".to_string()),
            ("page", page.to_string()),
        ]
    }

    fn advance(&self, page: &u32, _data: &Value, item_count: usize) -> Advance<u32> {
        if item_count == 0 {
            Advance::Done
        } else {
            Advance::Next(page + 1)
        }
    }
}

/// Picks the flow items CSV that drives a comment crawl
///
/// In order: the explicit path, the file named by the last feed crawl's
/// manifest, then the newest `*_flow_items.csv` in the data directory.
pub fn resolve_input(explicit: Option<&Path>, output: &OutputConfig) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(CrawlError::InputNotFound(format!(
            "{} does not exist",
            path.display()
        )));
    }

    let manifest_path = output.manifest_path();
    match RunManifest::read(&manifest_path) {
        Ok(Some(manifest)) if manifest.flow_items_path.is_file() => {
            tracing::debug!("Input taken from manifest {}", manifest_path.display());
            return Ok(manifest.flow_items_path);
        }
        Ok(Some(manifest)) => tracing::warn!(
            "Manifest points at missing file {}, searching {}",
            manifest.flow_items_path.display(),
            output.data_dir.display()
        ),
        Ok(None) => {}
        Err(e) => tracing::warn!("Ignoring unreadable manifest {}: {}", manifest_path.display(), e),
    }

    find_latest_flow_items(&output.data_dir)?.ok_or_else(|| {
        CrawlError::InputNotFound(format!(
            "no *_flow_items.csv in {}",
            output.data_dir.display()
        ))
    })
}

/// Drops repeated ids, keeping the first occurrence of each
fn unique_post_ids(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Result of a comment crawl
#[derive(Debug, Clone, Default)]
pub struct CommentReport {
    pub input: PathBuf,

    /// Distinct posts processed
    pub posts: usize,

    /// Posts whose thread was written to disk
    pub saved: usize,

    /// Posts abandoned after a failed listing request, or whose id cannot
    /// name a file
    pub failed: usize,

    /// Comments written across all posts
    pub comments: u64,
}

/// Fetches and saves the comment threads of many posts
pub struct CommentCrawler<'a> {
    api: &'a ApiClient,
    config: &'a Config,
    sleeper: &'a dyn Sleeper,
}

impl<'a> CommentCrawler<'a> {
    pub fn new(api: &'a ApiClient, config: &'a Config, sleeper: &'a dyn Sleeper) -> Self {
        Self {
            api,
            config,
            sleeper,
        }
    }

    /// Fetches every comment of one post
    ///
    /// # Returns
    ///
    /// * `Ok(Some(comments))` - All pages were fetched
    /// * `Ok(None)` - A page failed; the partial thread is discarded
    pub async fn fetch_comments(&self, post_id: &str) -> Result<Option<Vec<Value>>> {
        let strategy = CommentStrategy::new(post_id, self.config.comments.sort_by.as_str());
        let paginator = Paginator::new(self.api, self.sleeper, &self.config.crawler);

        let mut comments = Vec::new();
        let outcome = paginator
            .run(&strategy, |page| {
                comments.extend(page);
                Ok(())
            })
            .await?;

        if !outcome.is_complete() {
            tracing::error!(
                "Giving up on post {} at page {} ({:?})",
                post_id,
                outcome.last_cursor,
                outcome.stop
            );
            return Ok(None);
        }

        tracing::info!(
            "Fetched total {} comments for post {} in {} requests",
            comments.len(),
            post_id,
            outcome.requests
        );
        Ok(Some(comments))
    }

    /// Crawls the comments of every post listed in `input`
    pub async fn run(&self, input: &Path) -> Result<CommentReport> {
        tracing::info!("Using flow items file: {}", input.display());

        let all_ids = load_post_ids(input)?;
        let total = all_ids.len();
        let post_ids = unique_post_ids(all_ids);
        if post_ids.len() < total {
            tracing::debug!("Skipping {} duplicate post ids", total - post_ids.len());
        }
        tracing::info!("Found {} posts to process", post_ids.len());

        let comments_dir = self.config.output.comments_path();
        let mut report = CommentReport {
            input: input.to_path_buf(),
            posts: post_ids.len(),
            ..CommentReport::default()
        };

        let mut fetched_any = false;
        for post_id in &post_ids {
            if !is_valid_post_id(post_id) {
                tracing::warn!("Skipping post id '{}': not usable as a file name", post_id);
                report.failed += 1;
                continue;
            }

            if fetched_any {
                self.sleeper.sleep(self.config.crawler.post_delay()).await;
            }
            fetched_any = true;

            match self.fetch_comments(post_id).await? {
                Some(comments) => {
                    let document = CommentDocument::new(comments);
                    if document.is_empty() {
                        tracing::debug!("Post {} has no comments", post_id);
                    }
                    let path = write_comment_document(&comments_dir, post_id, &document)?;
                    report.saved += 1;
                    report.comments += document.len() as u64;
                    tracing::info!("Saved comments for post {} to {}", post_id, path.display());
                }
                None => report.failed += 1,
            }
        }

        tracing::info!(
            "Finished fetching all comments: {} saved, {} failed, {} comments",
            report.saved,
            report.failed,
            report.comments
        );

        Ok(report)
    }
}
