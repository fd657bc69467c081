//! Record types produced by the crawlers
//!
//! # Components
//!
//! - `FeedItem` / `UserRef`: one entry of the feed listing and its author
//! - `FlowItemRow`: the flattened CSV form of a `FeedItem`
//! - `CommentDocument`: every comment of one post in the API's envelope

mod comment;
mod feed_item;

pub use comment::{CommentData, CommentDocument};
pub use feed_item::{FeedItem, FlowItemRow, UserRef, FLOW_ITEMS_COLUMNS};
