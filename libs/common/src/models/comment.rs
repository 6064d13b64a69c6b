//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    pub content: String,
    pub post_id: String,
    pub user_id: String,
    /// Comment this one replies to
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub likes: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New comment creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
    pub post_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replied_to_comment_id: Option<String>,
}

/// Comment update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentUpdate {
    pub content: String,
}
