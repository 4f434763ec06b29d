//! Per-user tag affinity and view-event models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Learned affinity of one user for one tag. At most one row exists per
/// (user, tag) pair; `score` stays within [0.0, 1.0].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInterest {
    pub user_id: String,
    pub tag_id: String,
    pub score: f64,
    /// One-way latch, set once `score` crosses the auto-subscribe threshold.
    pub is_auto_subscribed: bool,
    /// Explicit user toggle, independent of `score`.
    pub is_manually_followed: bool,
    pub updated_at: DateTime<Utc>,
}

/// Request body for reporting a view.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordViewRequest {
    pub content_id: String,
    #[serde(default)]
    pub view_duration_seconds: i64,
    #[serde(default)]
    pub completion_percent: f64,
}

/// Request body for following or unfollowing a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowTagRequest {
    #[serde(default = "default_follow")]
    pub follow: bool,
}

fn default_follow() -> bool {
    true
}
