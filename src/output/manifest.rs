//! Record of the last completed feed crawl
//!
//! The comment crawler reads this to find its input instead of guessing from
//! file names.

use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// CSV file the feed crawl appended to
    pub flow_items_path: PathBuf,

    pub completed_at: DateTime<Utc>,

    /// Pages yielded by the feed crawl
    pub pages: u64,

    /// Rows written by the feed crawl
    pub items: u64,
}

impl RunManifest {
    pub fn new(flow_items_path: PathBuf, pages: u64, items: u64) -> Self {
        Self {
            flow_items_path,
            completed_at: Utc::now(),
            pages,
            items,
        }
    }

    /// Writes the manifest, replacing any previous one
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    /// Reads the manifest at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(RunManifest))` - The manifest exists and parses
    /// * `Ok(None)` - No manifest has been written yet
    /// * `Err(CrawlError)` - The file exists but cannot be read or parsed
    pub fn read(path: &Path) -> Result<Option<Self>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
