//! Feed endpoints: the three ranked variants, view recording and
//! interest management.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::feed;
use crate::models::{
    Content, ContentFeedItem, FeedResponse, FollowTagRequest, RecordViewRequest, Tag, User,
    UserInterest,
};
use crate::AppState;

const DEFAULT_PAGE_LIMIT: u32 = 10;
const MAX_PAGE_LIMIT: u32 = 50;

/// Query parameters shared by all feed variants.
#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

fn page_limit(params: &FeedParams) -> Result<usize, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_LIMIT
        )));
    }
    Ok(limit as usize)
}

/// GET /api/feed (and /api/feed/for-you) - Personalized ranked feed.
///
/// Re-ranks the entire candidate set on every page request; the cursor
/// marks the last returned item in the recomputed ranking.
pub async fn get_feed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>, AppError> {
    let limit = page_limit(&params)?;

    let interests: HashMap<String, f64> = state
        .repo
        .list_interests(&user.id)
        .await?
        .into_iter()
        .map(|i| (i.tag_id, i.score))
        .collect();

    let candidates: Vec<Content> = state
        .repo
        .list_all_content()
        .await?
        .into_iter()
        .filter(|c| c.targets_role(&user.role))
        .collect();

    let candidate_ids: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();
    let tags_by_content = state.repo.tags_for_contents(&candidate_ids).await?;
    let like_counts = state.repo.like_counts().await?;
    let comment_counts = state.repo.comment_counts().await?;

    let ranked = feed::rank_candidates(
        candidates,
        &tags_by_content,
        &user,
        &interests,
        &like_counts,
        &comment_counts,
        Utc::now(),
    );
    let page = feed::paginate_ranked(&ranked, params.cursor.as_deref(), limit);

    let contents: Vec<Content> = page.items.into_iter().map(|rc| rc.content).collect();
    let items = build_feed_items(
        &state,
        &user,
        contents,
        &tags_by_content,
        &like_counts,
        &comment_counts,
    )
    .await?;

    Ok(Json(FeedResponse {
        items,
        next_cursor: page.next_cursor,
        has_more: page.has_more,
    }))
}

/// GET /api/feed/following - Content from followed tags, newest first.
pub async fn get_following_feed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>, AppError> {
    let limit = page_limit(&params)?;

    let followed = state.repo.followed_tag_ids(&user.id).await?;
    if followed.is_empty() {
        return Ok(Json(FeedResponse::empty()));
    }

    let before = cursor_timestamp(&state, params.cursor.as_deref()).await?;
    let contents = state
        .repo
        .list_content_by_tags(&followed, before, (limit + 1) as i64)
        .await?;

    chronological_page(&state, &user, contents, limit).await
}

/// GET /api/feed/discover - Content outside the viewer's usual topics,
/// newest first. Untagged content is always eligible.
pub async fn get_discover_feed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>, AppError> {
    let limit = page_limit(&params)?;

    let over_familiar = state
        .repo
        .high_affinity_tag_ids(&user.id, feed::DISCOVER_AFFINITY_CUTOFF)
        .await?;

    let before = cursor_timestamp(&state, params.cursor.as_deref()).await?;
    let contents = state
        .repo
        .list_content_excluding_tags(&over_familiar, before, (limit + 1) as i64)
        .await?;

    chronological_page(&state, &user, contents, limit).await
}

/// POST /api/feed/view - Record a view event and update interests.
pub async fn record_view(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<RecordViewRequest>,
) -> Result<Json<Value>, AppError> {
    // Content is resolved before any write: a view of unknown content is
    // rejected whole rather than partially recorded.
    let content = state
        .repo
        .get_content(&request.content_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content {} not found", request.content_id)))?;

    let tags = state.repo.tags_for_content(&content.id).await?;
    state
        .repo
        .record_view(
            &user.id,
            &content.id,
            &tags,
            request.view_duration_seconds,
            request.completion_percent,
        )
        .await?;

    Ok(Json(json!({ "status": "ok" })))
}

/// GET /api/feed/interests - The caller's tag interests.
pub async fn get_interests(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<UserInterest>>, AppError> {
    Ok(Json(state.repo.list_interests(&user.id).await?))
}

/// POST /api/feed/interests/{tag_id}/follow - Follow or unfollow a tag.
pub async fn follow_tag(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(tag_id): Path<String>,
    Json(request): Json<FollowTagRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .repo
        .get_tag(&tag_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", tag_id)))?;

    state.repo.set_follow(&user.id, &tag_id, request.follow).await?;

    Ok(Json(json!({ "status": "ok", "is_following": request.follow })))
}

/// Resolve a chronological cursor to the referenced row's timestamp.
/// Unknown or stale cursors degrade to "no cursor".
async fn cursor_timestamp(
    state: &AppState,
    cursor: Option<&str>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    match cursor {
        Some(id) => Ok(state.repo.get_content(id).await?.map(|c| c.created_at)),
        None => Ok(None),
    }
}

/// Package a created_at-ordered candidate list (fetched with limit+1)
/// into a feed page.
async fn chronological_page(
    state: &AppState,
    viewer: &User,
    mut contents: Vec<Content>,
    limit: usize,
) -> Result<Json<FeedResponse>, AppError> {
    let has_more = contents.len() > limit;
    contents.truncate(limit);
    let next_cursor = if has_more {
        contents.last().map(|c| c.id.clone())
    } else {
        None
    };

    let ids: Vec<String> = contents.iter().map(|c| c.id.clone()).collect();
    let tags_by_content = state.repo.tags_for_contents(&ids).await?;
    let like_counts = state.repo.like_counts().await?;
    let comment_counts = state.repo.comment_counts().await?;

    let items = build_feed_items(
        state,
        viewer,
        contents,
        &tags_by_content,
        &like_counts,
        &comment_counts,
    )
    .await?;

    Ok(Json(FeedResponse {
        items,
        next_cursor,
        has_more,
    }))
}

/// Enrich content rows into feed items: author profile, tags, live
/// engagement counts and the viewer's own like/bookmark state.
pub(crate) async fn build_feed_items(
    state: &AppState,
    viewer: &User,
    contents: Vec<Content>,
    tags_by_content: &HashMap<String, Vec<Tag>>,
    like_counts: &HashMap<String, i64>,
    comment_counts: &HashMap<String, i64>,
) -> Result<Vec<ContentFeedItem>, AppError> {
    let mut author_ids: Vec<String> = contents.iter().map(|c| c.author_id.clone()).collect();
    author_ids.sort();
    author_ids.dedup();
    let authors = state.repo.users_by_ids(&author_ids).await?;

    let mut items = Vec::with_capacity(contents.len());
    for content in contents {
        let author = authors
            .get(&content.author_id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Author {} missing", content.author_id)))?;
        let is_liked = state.repo.is_liked(&viewer.id, &content.id).await?;
        let is_bookmarked = state.repo.is_bookmarked(&viewer.id, &content.id).await?;

        items.push(ContentFeedItem {
            id: content.id.clone(),
            author,
            content_type: content.content_type,
            title: content.title,
            body: content.body,
            media_url: content.media_url,
            thumbnail_url: content.thumbnail_url,
            duration_seconds: content.duration_seconds,
            is_company_important: content.is_company_important,
            tags: tags_by_content.get(&content.id).cloned().unwrap_or_default(),
            like_count: like_counts.get(&content.id).copied().unwrap_or(0),
            comment_count: comment_counts.get(&content.id).copied().unwrap_or(0),
            is_liked,
            is_bookmarked,
            created_at: content.created_at,
        });
    }

    Ok(items)
}
