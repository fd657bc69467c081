//! Comment thread documents
//!
//! A saved thread reuses the listing endpoint's own envelope so that tools
//! reading the API responses can read the saved files unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// All comments of one post wrapped in a success envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentDocument {
    pub ok: i64,
    pub msg: String,
    pub data: CommentData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentData {
    pub list: Vec<Value>,
    #[serde(rename = "authorZan")]
    pub author_zan: Vec<Value>,
    #[serde(rename = "foldCnt")]
    pub fold_cnt: Option<i64>,
}

impl CommentDocument {
    pub fn new(comments: Vec<Value>) -> Self {
        Self {
            ok: 0,
            msg: String::new(),
            data: CommentData {
                list: comments,
                author_zan: Vec::new(),
                fold_cnt: None,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.data.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.list.is_empty()
    }
}
