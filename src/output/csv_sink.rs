//! Flow items CSV file
//!
//! The header row is written once, when the file is missing or empty, and
//! never again. Rows are appended page by page and the file is closed between
//! pages, so an interrupted run leaves a valid file that just lacks its tail.
//! Nothing is deduplicated: crawling the same feed twice into one file
//! appends every row twice.

use crate::model::{FeedItem, FLOW_ITEMS_COLUMNS};
use crate::Result;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Suffix shared by every flow items file
pub const FLOW_ITEMS_SUFFIX: &str = "_flow_items.csv";

/// File name for a crawl started on `date`, e.g. `20240131_flow_items.csv`
pub fn flow_items_file_name(date: NaiveDate) -> String {
    format!("{}{}", date.format("%Y%m%d"), FLOW_ITEMS_SUFFIX)
}

/// Append-only writer for feed entries
#[derive(Debug, Clone)]
pub struct FlowItemsCsv {
    path: PathBuf,
}

impl FlowItemsCsv {
    /// Opens (or creates) the file at `path`, writing the header if needed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        if needs_header(&path)? {
            let file = File::create(&path)?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.write_record(FLOW_ITEMS_COLUMNS)?;
            writer.flush()?;
            tracing::debug!("Wrote CSV header to {}", path.display());
        }

        Ok(Self { path })
    }

    /// Opens the dated file for `date` inside `data_dir`
    pub fn open_dated(data_dir: &Path, date: NaiveDate) -> Result<Self> {
        Self::open(data_dir.join(flow_items_file_name(date)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row per item
    ///
    /// # Returns
    ///
    /// The number of rows written
    pub fn append(&self, items: &[FeedItem]) -> Result<usize> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        for item in items {
            writer.serialize(item.to_row())?;
        }
        writer.flush()?;

        Ok(items.len())
    }
}

/// True if the file does not exist yet or holds zero bytes
fn needs_header(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.len() == 0),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Deserialize)]
struct PostIdRow {
    id: String,
}

/// Reads the `id` column of a flow items file, in file order
pub fn load_post_ids(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut ids = Vec::new();

    for row in reader.deserialize::<PostIdRow>() {
        let row = row?;
        let id = row.id.trim();
        if !id.is_empty() {
            ids.push(id.to_string());
        }
    }

    Ok(ids)
}

/// Finds the lexicographically greatest `*_flow_items.csv` in `dir`
///
/// With the date-prefixed naming this is the most recent crawl.
pub fn find_latest_flow_items(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut latest: Option<String> = None;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(FLOW_ITEMS_SUFFIX) {
            continue;
        }
        if latest.as_deref().map_or(true, |current| name.as_str() > current) {
            latest = Some(name);
        }
    }

    Ok(latest.map(|name| dir.join(name)))
}
