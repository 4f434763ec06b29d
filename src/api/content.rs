//! Content API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::feed::build_feed_items;
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{ContentFeedItem, CreateContentRequest};
use crate::AppState;

/// Query parameters for content listing.
#[derive(Debug, Deserialize)]
pub struct ListContentParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub content_type: Option<String>,
}

/// GET /api/content - List recent content, newest first.
pub async fn list_content(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ListContentParams>,
) -> Result<Json<Vec<ContentFeedItem>>, AppError> {
    let skip = params.skip.unwrap_or(0).max(0);
    let limit = params.limit.unwrap_or(20);
    if !(1..=100).contains(&limit) {
        return Err(AppError::Validation(
            "limit must be between 1 and 100".to_string(),
        ));
    }

    let contents = state
        .repo
        .list_content(params.content_type.as_deref(), skip, limit)
        .await?;

    let ids: Vec<String> = contents.iter().map(|c| c.id.clone()).collect();
    let tags_by_content = state.repo.tags_for_contents(&ids).await?;
    let like_counts = state.repo.like_counts().await?;
    let comment_counts = state.repo.comment_counts().await?;

    let items = build_feed_items(
        &state,
        &user,
        contents,
        &tags_by_content,
        &like_counts,
        &comment_counts,
    )
    .await?;
    Ok(Json(items))
}

/// POST /api/content - Post new content.
pub async fn create_content(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateContentRequest>,
) -> Result<Json<ContentFeedItem>, AppError> {
    if request.title.is_none() && request.body.is_none() && request.media_url.is_none() {
        return Err(AppError::Validation(
            "Content needs a title, body or media".to_string(),
        ));
    }
    if request.is_company_important && !user.is_comms_team {
        return Err(AppError::Forbidden(
            "Only comms team can mark content company-important".to_string(),
        ));
    }

    let content = state.repo.create_content(&user.id, &request).await?;
    tracing::info!(content_id = %content.id, author_id = %user.id, "content created");

    enriched_item(&state, &user, content).await
}

/// GET /api/content/{id} - Get one content item with details.
pub async fn get_content(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ContentFeedItem>, AppError> {
    let content = state
        .repo
        .get_content(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content {} not found", id)))?;

    enriched_item(&state, &user, content).await
}

async fn enriched_item(
    state: &AppState,
    user: &crate::models::User,
    content: crate::models::Content,
) -> Result<Json<ContentFeedItem>, AppError> {
    let ids = vec![content.id.clone()];
    let tags_by_content = state.repo.tags_for_contents(&ids).await?;
    let like_counts = state.repo.like_counts().await?;
    let comment_counts = state.repo.comment_counts().await?;

    let mut items = build_feed_items(
        state,
        user,
        vec![content],
        &tags_by_content,
        &like_counts,
        &comment_counts,
    )
    .await?;
    items
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::Internal("Failed to build feed item".to_string()))
}
