//! Feed response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContentType, Tag, User};

/// A feed entry: content enriched with author, tags, live engagement
/// counts and the viewer's own interaction state.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContentFeedItem {
    pub id: String,
    pub author: User,
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
    pub is_company_important: bool,
    pub tags: Vec<Tag>,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked: bool,
    pub is_bookmarked: bool,
    pub created_at: DateTime<Utc>,
}

/// One page of a feed.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponse {
    pub items: Vec<ContentFeedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl FeedResponse {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            has_more: false,
        }
    }
}
