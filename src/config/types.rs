use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the crawler
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// values the platform expects.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub crawler: CrawlerConfig,
    pub feed: FeedConfig,
    pub comments: CommentsConfig,
    pub output: OutputConfig,
}

/// Remote API connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme and host of the platform, also sent as the `Origin` header
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path appended to `base_url` to build the `Referer` header
    #[serde(rename = "referer-path")]
    pub referer_path: String,

    /// Value of the `X-Client-Locale` header
    pub locale: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.zfrontier.com".to_string(),
            referer_path: "/app/circle/1".to_string(),
            locale: "zh-CN".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Pagination pacing and stopping rules
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Feed offset to start from; empty means the newest page
    #[serde(rename = "start-offset")]
    pub start_offset: String,

    /// Feed pagination stops once the next offset drops below this value
    #[serde(rename = "min-offset")]
    pub min_offset: i64,

    /// Delay between two pages of the same listing (seconds)
    #[serde(rename = "page-delay-secs")]
    pub page_delay_secs: u64,

    /// Delay between the comment threads of two posts (seconds)
    #[serde(rename = "post-delay-secs")]
    pub post_delay_secs: u64,

    /// Wait after a "too frequent" rejection before retrying (seconds)
    #[serde(rename = "rate-limit-wait-secs")]
    pub rate_limit_wait_secs: u64,
}

impl CrawlerConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_secs(self.page_delay_secs)
    }

    pub fn post_delay(&self) -> Duration {
        Duration::from_secs(self.post_delay_secs)
    }

    pub fn rate_limit_wait(&self) -> Duration {
        Duration::from_secs(self.rate_limit_wait_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_offset: String::new(),
            min_offset: 1000,
            page_delay_secs: 2,
            post_delay_secs: 2,
            rate_limit_wait_secs: 600,
        }
    }
}

/// Feed listing filters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Circle id
    pub cid: String,

    #[serde(rename = "sort-by")]
    pub sort_by: String,

    /// Sent as `tagIds[0]`
    #[serde(rename = "tag-id")]
    pub tag_id: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            cid: "1".to_string(),
            sort_by: "new".to_string(),
            tag_id: "3023".to_string(),
        }
    }
}

/// Comment listing options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    #[serde(rename = "sort-by")]
    pub sort_by: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            sort_by: "ctime_asc".to_string(),
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding the CSV files, the manifest and the comments folder
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,

    /// Comments folder, relative to `data_dir`
    #[serde(rename = "comments-dir")]
    pub comments_dir: String,

    /// Manifest file name, relative to `data_dir`
    pub manifest: String,

    /// Debug log file (not relative to `data_dir`)
    #[serde(rename = "log-file")]
    pub log_file: PathBuf,
}

impl OutputConfig {
    pub fn comments_path(&self) -> PathBuf {
        self.data_dir.join(&self.comments_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.data_dir.join(&self.manifest)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            comments_dir: "comments".to_string(),
            manifest: "crawl_manifest.json".to_string(),
            log_file: PathBuf::from("debug.log"),
        }
    }
}
