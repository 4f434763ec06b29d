//! Content model and the requests that create and comment on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Media type of a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Video,
    Audio,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Video => "video",
            ContentType::Audio => "audio",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "text" => Some(ContentType::Text),
            "video" => Some(ContentType::Video),
            "audio" => Some(ContentType::Audio),
            _ => None,
        }
    }
}

/// Whether content may leave the company boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharingPolicy {
    InternalOnly,
    ExternalAllowed,
}

impl SharingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SharingPolicy::InternalOnly => "internal_only",
            SharingPolicy::ExternalAllowed => "external_allowed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "internal_only" => Some(SharingPolicy::InternalOnly),
            "external_allowed" => Some(SharingPolicy::ExternalAllowed),
            _ => None,
        }
    }
}

/// A piece of posted content. Tags are associated separately via the
/// content-tag junction table; engagement counts are derived per request
/// and never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub id: String,
    pub author_id: String,
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
    pub sharing_policy: SharingPolicy,
    pub comments_enabled: bool,
    /// Role names this content targets. `None` means everyone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_roles: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Content {
    /// Whether a viewer with the given role is in the content's audience.
    pub fn targets_role(&self, role: &str) -> bool {
        match &self.target_roles {
            Some(roles) if !roles.is_empty() => roles.iter().any(|r| r == role),
            _ => true,
        }
    }
}

/// Request body for posting content.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentRequest {
    #[serde(default = "default_content_type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    pub is_company_important: bool,
    #[serde(default = "default_sharing_policy")]
    pub sharing_policy: SharingPolicy,
    #[serde(default = "default_comments_enabled")]
    pub comments_enabled: bool,
    #[serde(default)]
    pub target_roles: Option<Vec<String>>,
    /// Tags to attach at creation time.
    #[serde(default)]
    pub tag_ids: Vec<String>,
}

fn default_content_type() -> ContentType {
    ContentType::Text
}

fn default_sharing_policy() -> SharingPolicy {
    SharingPolicy::InternalOnly
}

fn default_comments_enabled() -> bool {
    true
}

/// A comment on content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content_id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Comment enriched with its author profile for display.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    pub id: String,
    pub content_id: String,
    pub author: User,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for posting a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub body: String,
}
