//! Bearer-token authentication.
//!
//! Sessions are opaque `id.secret` tokens stored server-side; the secret
//! half is compared in constant time to mitigate timing attacks.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use chrono::{DateTime, Duration, Utc};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::User;
use crate::AppState;

/// A server-side session backing one issued bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub secret: String,
    pub expires_at: DateTime<Utc>,
}

/// Mint a new session for a user. Returns the session row to persist and
/// the full token handed to the client.
pub fn mint_session(user_id: &str, ttl_minutes: i64) -> (Session, String) {
    let session = Session {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        secret: Uuid::new_v4().to_string(),
        expires_at: Utc::now() + Duration::minutes(ttl_minutes),
    };
    let token = format!("{}.{}", session.id, session.secret);
    (session, token)
}

/// Split a bearer token into its (session id, secret) halves.
pub fn parse_token(token: &str) -> Option<(&str, &str)> {
    token.split_once('.')
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Extractor for the authenticated caller. Rejects with 401 before any
/// handler logic runs when the token is missing, malformed, expired or
/// references a deleted user.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let (session_id, secret) = parse_token(token)
            .ok_or_else(|| AppError::Unauthorized("Malformed token".to_string()))?;

        let session = state
            .repo
            .get_session(session_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown session".to_string()))?;

        if !constant_time_compare(secret, &session.secret) {
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }
        if session.expires_at < Utc::now() {
            return Err(AppError::Unauthorized("Token expired".to_string()));
        }

        let user = state
            .repo
            .get_user(&session.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_session_round_trip() {
        let (session, token) = mint_session("user-1", 60);
        let (id, secret) = parse_token(&token).unwrap();
        assert_eq!(id, session.id);
        assert_eq!(secret, session.secret);
        assert!(session.expires_at > Utc::now());
    }

    #[test]
    fn test_parse_token_rejects_missing_separator() {
        assert!(parse_token("not-a-token").is_none());
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("short", "much-longer"));
        assert!(constant_time_compare("", ""));
    }
}
