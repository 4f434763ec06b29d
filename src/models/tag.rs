//! Tag model.

use serde::{Deserialize, Serialize};

/// A topic tag. Content references tags through the junction table;
/// tags have their own lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Request body for creating a tag (comms team only).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub category: Option<String>,
}
