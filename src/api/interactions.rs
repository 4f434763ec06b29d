//! Like, bookmark and comment endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::{Comment, CommentWithAuthor, Content, CreateCommentRequest};
use crate::AppState;

async fn require_content(state: &AppState, id: &str) -> Result<Content, AppError> {
    state
        .repo
        .get_content(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content {} not found", id)))
}

/// POST /api/content/{id}/like - Toggle a like.
pub async fn toggle_like(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_content(&state, &id).await?;
    let is_liked = state.repo.toggle_like(&user.id, &id).await?;
    let status = if is_liked { "liked" } else { "unliked" };
    Ok(Json(json!({ "status": status, "is_liked": is_liked })))
}

/// POST /api/content/{id}/bookmark - Toggle a bookmark.
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_content(&state, &id).await?;
    let is_bookmarked = state.repo.toggle_bookmark(&user.id, &id).await?;
    let status = if is_bookmarked {
        "bookmarked"
    } else {
        "unbookmarked"
    };
    Ok(Json(
        json!({ "status": status, "is_bookmarked": is_bookmarked }),
    ))
}

/// GET /api/content/{id}/comments - List comments, oldest first.
pub async fn list_comments(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<CommentWithAuthor>>, AppError> {
    require_content(&state, &id).await?;

    let comments = state.repo.list_comments(&id).await?;
    with_authors(&state, comments).await
}

/// POST /api/content/{id}/comments - Post a comment.
pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<Json<CommentWithAuthor>, AppError> {
    let content = require_content(&state, &id).await?;
    if !content.comments_enabled {
        return Err(AppError::Validation(
            "Comments are disabled on this content".to_string(),
        ));
    }
    if request.body.trim().is_empty() {
        return Err(AppError::Validation("Comment body is required".to_string()));
    }

    let comment = state
        .repo
        .create_comment(&id, &user.id, request.body.trim())
        .await?;

    Ok(Json(CommentWithAuthor {
        id: comment.id,
        content_id: comment.content_id,
        author: user,
        body: comment.body,
        created_at: comment.created_at,
    }))
}

async fn with_authors(
    state: &AppState,
    comments: Vec<Comment>,
) -> Result<Json<Vec<CommentWithAuthor>>, AppError> {
    let mut author_ids: Vec<String> = comments.iter().map(|c| c.author_id.clone()).collect();
    author_ids.sort();
    author_ids.dedup();
    let authors = state.repo.users_by_ids(&author_ids).await?;

    let mut result = Vec::with_capacity(comments.len());
    for comment in comments {
        let author = authors
            .get(&comment.author_id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Author {} missing", comment.author_id)))?;
        result.push(CommentWithAuthor {
            id: comment.id,
            content_id: comment.content_id,
            author,
            body: comment.body,
            created_at: comment.created_at,
        });
    }
    Ok(Json(result))
}
