//! Comment thread files
//!
//! One pretty-printed JSON document per post, written only after every page
//! of the thread has been fetched and overwritten on each run.

use crate::model::CommentDocument;
use crate::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Error, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Path of the comment file for `post_id`
pub fn comment_file_path(comments_dir: &Path, post_id: &str) -> PathBuf {
    comments_dir.join(format!("{}.json", post_id))
}

/// True if `post_id` can name a file directly inside the comments directory
pub fn is_valid_post_id(post_id: &str) -> bool {
    !(post_id.is_empty()
        || post_id == "."
        || post_id == ".."
        || post_id.contains(&['/', '\\'][..]))
}

/// Writes (or overwrites) the comment document of one post
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(CrawlError)` - The id is not usable as a file name or the write failed
pub fn write_comment_document(
    comments_dir: &Path,
    post_id: &str,
    document: &CommentDocument,
) -> Result<PathBuf> {
    if !is_valid_post_id(post_id) {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("post id '{}' is not a valid file name", post_id),
        )
        .into());
    }

    fs::create_dir_all(comments_dir)?;
    let path = comment_file_path(comments_dir, post_id);

    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.flush()?;

    Ok(path)
}
