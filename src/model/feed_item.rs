//! Feed entries as returned by the flow listing and as stored in CSV

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column order of the flow items CSV file
pub const FLOW_ITEMS_COLUMNS: [&str; 7] = [
    "id",
    "hash_id",
    "view_url",
    "title",
    "user_nickname",
    "user_hash_id",
    "user_view_url",
];

/// Author of a feed entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRef {
    pub nickname: String,
    pub hash_id: String,
    pub view_url: String,
}

/// One entry of the feed listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedItem {
    pub id: i64,
    pub hash_id: String,
    pub view_url: String,
    #[serde(default)]
    pub title: String,
    pub user: UserRef,
}

impl FeedItem {
    /// Builds an item from one element of the listing's `list` array
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        FeedItem::deserialize(value)
    }

    /// Flattens the item into a CSV row
    pub fn to_row(&self) -> FlowItemRow<'_> {
        FlowItemRow {
            id: self.id,
            hash_id: &self.hash_id,
            view_url: &self.view_url,
            title: &self.title,
            user_nickname: &self.user.nickname,
            user_hash_id: &self.user.hash_id,
            user_view_url: &self.user.view_url,
        }
    }
}

/// A CSV row; field order matches [`FLOW_ITEMS_COLUMNS`]
#[derive(Debug, Serialize)]
pub struct FlowItemRow<'a> {
    pub id: i64,
    pub hash_id: &'a str,
    pub view_url: &'a str,
    pub title: &'a str,
    pub user_nickname: &'a str,
    pub user_hash_id: &'a str,
    pub user_view_url: &'a str,
}
