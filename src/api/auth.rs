//! Auth endpoints: login, register and the current-user profile.

use axum::{extract::State, Json};

use crate::auth::{mint_session, CurrentUser};
use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, User};
use crate::AppState;

/// POST /api/auth/login - Exchange an SSO token for a session token.
///
/// Demo deployments accept any token: tokens containing `@` are treated
/// as emails, anything else becomes `<token>@demo.pulsync.io`. Unknown
/// emails get a user created on the fly.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if request.token.trim().is_empty() {
        return Err(AppError::Validation("Token is required".to_string()));
    }

    let email = if request.token.contains('@') {
        request.token.clone()
    } else {
        format!("{}@demo.pulsync.io", request.token)
    };

    let user = match state.repo.get_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            let local_part = email.split('@').next().unwrap_or(&email);
            let display_name = titleize(&local_part.replace('.', " "));
            state
                .repo
                .create_user(&RegisterRequest {
                    email: email.clone(),
                    display_name,
                    avatar_url: None,
                    role: "engineering".to_string(),
                    department: "Engineering".to_string(),
                    is_comms_team: false,
                })
                .await?
        }
    };

    issue_token(&state, user).await
}

/// POST /api/auth/register - Register a new user.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if request.display_name.trim().is_empty() {
        return Err(AppError::Validation("Display name is required".to_string()));
    }
    if state.repo.get_user_by_email(&request.email).await?.is_some() {
        return Err(AppError::Validation(
            "Email already registered".to_string(),
        ));
    }

    let user = state.repo.create_user(&request).await?;
    issue_token(&state, user).await
}

/// GET /api/auth/me - The authenticated caller's profile.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

async fn issue_token(state: &AppState, user: User) -> Result<Json<LoginResponse>, AppError> {
    let (session, token) = mint_session(&user.id, state.config.session_ttl_minutes);
    state.repo.create_session(&session).await?;

    tracing::info!(user_id = %user.id, "issued session token");
    Ok(Json(LoginResponse {
        access_token: token,
        user,
    }))
}

fn titleize(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titleize() {
        assert_eq!(titleize("jane doe"), "Jane Doe");
        assert_eq!(titleize("solo"), "Solo");
        assert_eq!(titleize(""), "");
    }
}
