//! User model and auth DTOs.

use serde::{Deserialize, Serialize};

/// A platform user. `role` drives content targeting; `is_comms_team`
/// grants tag creation and admin access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub role: String,
    pub department: String,
    pub is_comms_team: bool,
}

/// Request body for the login endpoint. The token is an SSO token in
/// production; for demo deployments any string is accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub token: String,
}

/// Response for login and register: a bearer token plus the user profile.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

/// Request body for registering a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub is_comms_team: bool,
}

fn default_role() -> String {
    "engineering".to_string()
}
