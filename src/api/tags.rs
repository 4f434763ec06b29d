//! Tag API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{CreateTagRequest, Tag};
use crate::AppState;

/// GET /api/tags - List all tags.
pub async fn list_tags(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<Tag>>, AppError> {
    Ok(Json(state.repo.list_tags().await?))
}

/// GET /api/tags/{id} - Get a single tag.
pub async fn get_tag(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Tag>, AppError> {
    let tag = state
        .repo
        .get_tag(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", id)))?;
    Ok(Json(tag))
}

/// POST /api/tags - Create a new tag (comms team only).
pub async fn create_tag(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateTagRequest>,
) -> Result<Json<Tag>, AppError> {
    if !user.is_comms_team {
        return Err(AppError::Forbidden(
            "Only comms team can create tags".to_string(),
        ));
    }
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Tag name is required".to_string()));
    }
    if request.slug.trim().is_empty() {
        return Err(AppError::Validation("Tag slug is required".to_string()));
    }
    if state.repo.get_tag_by_slug(&request.slug).await?.is_some() {
        return Err(AppError::Validation(
            "Tag slug already exists".to_string(),
        ));
    }

    let tag = state.repo.create_tag(&request).await?;
    Ok(Json(tag))
}
