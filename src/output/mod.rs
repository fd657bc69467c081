//! Output module for persisting crawl results
//!
//! This module handles:
//! - Appending feed entries to the dated flow items CSV file
//! - Writing one JSON document per post's comment thread
//! - Recording which CSV file the last feed crawl produced

mod csv_sink;
mod json_sink;
mod manifest;

pub use csv_sink::{
    find_latest_flow_items, flow_items_file_name, load_post_ids, FlowItemsCsv, FLOW_ITEMS_SUFFIX,
};
pub use json_sink::{comment_file_path, is_valid_post_id, write_comment_document};
pub use manifest::RunManifest;
