//! Database repository for all data operations.
//!
//! Uses prepared statements and transactions for data integrity.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::auth::Session;
use crate::errors::AppError;
use crate::feed;
use crate::models::{
    Comment, Content, ContentType, CreateContentRequest, CreateTagRequest, RegisterRequest,
    SharingPolicy, Tag, User, UserInterest,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// Create a new user.
    pub async fn create_user(&self, request: &RegisterRequest) -> Result<User, AppError> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO users (id, email, display_name, avatar_url, role, department, is_comms_team) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&request.email)
        .bind(&request.display_name)
        .bind(&request.avatar_url)
        .bind(&request.role)
        .bind(&request.department)
        .bind(request.is_comms_team as i32)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id,
            email: request.email.clone(),
            display_name: request.display_name.clone(),
            avatar_url: request.avatar_url.clone(),
            role: request.role.clone(),
            department: request.department.clone(),
            is_comms_team: request.is_comms_team,
        })
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, display_name, avatar_url, role, department, is_comms_team FROM users WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Get a user by email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, display_name, avatar_url, role, department, is_comms_team FROM users WHERE email = ?"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Fetch several users at once, keyed by id.
    pub async fn users_by_ids(&self, ids: &[String]) -> Result<HashMap<String, User>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT id, email, display_name, avatar_url, role, department, is_comms_team FROM users WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| {
                let user = user_from_row(row);
                (user.id.clone(), user)
            })
            .collect())
    }

    // ==================== SESSION OPERATIONS ====================

    /// Persist a newly minted session.
    pub async fn create_session(&self, session: &Session) -> Result<(), AppError> {
        sqlx::query("INSERT INTO sessions (id, user_id, secret, expires_at) VALUES (?, ?, ?, ?)")
            .bind(&session.id)
            .bind(&session.user_id)
            .bind(&session.secret)
            .bind(session.expires_at.to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Look up a session by id.
    pub async fn get_session(&self, id: &str) -> Result<Option<Session>, AppError> {
        let row = sqlx::query("SELECT id, user_id, secret, expires_at FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| {
            let expires_at: String = row.get("expires_at");
            Session {
                id: row.get("id"),
                user_id: row.get("user_id"),
                secret: row.get("secret"),
                expires_at: parse_ts(&expires_at),
            }
        }))
    }

    // ==================== TAG OPERATIONS ====================

    /// List all tags ordered by name.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        let rows = sqlx::query("SELECT id, name, slug, category FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(tag_from_row).collect())
    }

    /// Get a tag by ID.
    pub async fn get_tag(&self, id: &str) -> Result<Option<Tag>, AppError> {
        let row = sqlx::query("SELECT id, name, slug, category FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(tag_from_row))
    }

    /// Get a tag by its unique slug.
    pub async fn get_tag_by_slug(&self, slug: &str) -> Result<Option<Tag>, AppError> {
        let row = sqlx::query("SELECT id, name, slug, category FROM tags WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(tag_from_row))
    }

    /// Create a new tag.
    pub async fn create_tag(&self, request: &CreateTagRequest) -> Result<Tag, AppError> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO tags (id, name, slug, category) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&request.name)
            .bind(&request.slug)
            .bind(&request.category)
            .execute(&self.pool)
            .await?;

        Ok(Tag {
            id,
            name: request.name.clone(),
            slug: request.slug.clone(),
            category: request.category.clone(),
        })
    }

    // ==================== CONTENT OPERATIONS ====================

    /// Create content and attach its tags in one transaction.
    pub async fn create_content(
        &self,
        author_id: &str,
        request: &CreateContentRequest,
    ) -> Result<Content, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let target_roles_json = request
            .target_roles
            .as_ref()
            .map(|r| serde_json::to_string(r).unwrap_or_default());

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO contents (
                id, author_id, content_type, title, body, media_url, thumbnail_url,
                duration_seconds, is_company_important, sharing_policy, comments_enabled,
                target_roles, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(author_id)
        .bind(request.content_type.as_str())
        .bind(&request.title)
        .bind(&request.body)
        .bind(&request.media_url)
        .bind(&request.thumbnail_url)
        .bind(request.duration_seconds)
        .bind(request.is_company_important as i32)
        .bind(request.sharing_policy.as_str())
        .bind(request.comments_enabled as i32)
        .bind(&target_roles_json)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for tag_id in &request.tag_ids {
            let exists = sqlx::query("SELECT id FROM tags WHERE id = ?")
                .bind(tag_id)
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_none() {
                return Err(AppError::NotFound(format!("Tag {} not found", tag_id)));
            }

            sqlx::query("INSERT OR IGNORE INTO content_tags (content_id, tag_id) VALUES (?, ?)")
                .bind(&id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Content {
            id,
            author_id: author_id.to_string(),
            content_type: request.content_type,
            title: request.title.clone(),
            body: request.body.clone(),
            media_url: request.media_url.clone(),
            thumbnail_url: request.thumbnail_url.clone(),
            duration_seconds: request.duration_seconds,
            is_company_important: request.is_company_important,
            sharing_policy: request.sharing_policy,
            comments_enabled: request.comments_enabled,
            target_roles: request.target_roles.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get content by ID.
    pub async fn get_content(&self, id: &str) -> Result<Option<Content>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM contents WHERE id = ?",
            CONTENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(content_from_row))
    }

    /// List recent content, newest first, with optional type filter.
    pub async fn list_content(
        &self,
        content_type: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Content>, AppError> {
        let rows = match content_type {
            Some(ct) => {
                sqlx::query(&format!(
                    "SELECT {} FROM contents WHERE content_type = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    CONTENT_COLUMNS
                ))
                .bind(ct)
                .bind(limit)
                .bind(skip)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM contents ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    CONTENT_COLUMNS
                ))
                .bind(limit)
                .bind(skip)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(content_from_row).collect())
    }

    /// All content, as the candidate pool for personalized ranking.
    pub async fn list_all_content(&self) -> Result<Vec<Content>, AppError> {
        let rows = sqlx::query(&format!("SELECT {} FROM contents", CONTENT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(content_from_row).collect())
    }

    /// Content carrying any of the given tags, newest first. `before`
    /// restricts to rows strictly older than the cursor row.
    pub async fn list_content_by_tags(
        &self,
        tag_ids: &[String],
        before: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<Content>, AppError> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut sql = format!(
            "SELECT DISTINCT {} FROM contents c JOIN content_tags ct ON ct.content_id = c.id WHERE ct.tag_id IN ({})",
            prefixed_content_columns(),
            placeholders(tag_ids.len())
        );
        if before.is_some() {
            sql.push_str(" AND c.created_at < ?");
        }
        sql.push_str(" ORDER BY c.created_at DESC LIMIT ?");

        let mut query = sqlx::query(&sql);
        for tag_id in tag_ids {
            query = query.bind(tag_id);
        }
        if let Some(ts) = before {
            query = query.bind(ts.to_rfc3339());
        }
        let rows = query.bind(limit).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(content_from_row).collect())
    }

    /// Content carrying none of the given tags, newest first. Untagged
    /// content always qualifies.
    pub async fn list_content_excluding_tags(
        &self,
        exclude_tag_ids: &[String],
        before: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<Vec<Content>, AppError> {
        let mut sql = format!("SELECT {} FROM contents c WHERE 1 = 1", prefixed_content_columns());
        if !exclude_tag_ids.is_empty() {
            sql.push_str(&format!(
                " AND NOT EXISTS (SELECT 1 FROM content_tags ct WHERE ct.content_id = c.id AND ct.tag_id IN ({}))",
                placeholders(exclude_tag_ids.len())
            ));
        }
        if before.is_some() {
            sql.push_str(" AND c.created_at < ?");
        }
        sql.push_str(" ORDER BY c.created_at DESC LIMIT ?");

        let mut query = sqlx::query(&sql);
        for tag_id in exclude_tag_ids {
            query = query.bind(tag_id);
        }
        if let Some(ts) = before {
            query = query.bind(ts.to_rfc3339());
        }
        let rows = query.bind(limit).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(content_from_row).collect())
    }

    /// Resolve the tags of several content rows in one query.
    pub async fn tags_for_contents(
        &self,
        content_ids: &[String],
    ) -> Result<HashMap<String, Vec<Tag>>, AppError> {
        if content_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT ct.content_id, t.id, t.name, t.slug, t.category FROM content_tags ct JOIN tags t ON t.id = ct.tag_id WHERE ct.content_id IN ({}) ORDER BY t.name",
            placeholders(content_ids.len())
        );
        let mut query = sqlx::query(&sql);
        for id in content_ids {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut map: HashMap<String, Vec<Tag>> = HashMap::new();
        for row in &rows {
            let content_id: String = row.get("content_id");
            map.entry(content_id).or_default().push(tag_from_row(row));
        }
        Ok(map)
    }

    /// Resolve the tags of one content row.
    pub async fn tags_for_content(&self, content_id: &str) -> Result<Vec<Tag>, AppError> {
        let rows = sqlx::query(
            "SELECT t.id, t.name, t.slug, t.category FROM content_tags ct JOIN tags t ON t.id = ct.tag_id WHERE ct.content_id = ? ORDER BY t.name"
        )
        .bind(content_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(tag_from_row).collect())
    }

    // ==================== ENGAGEMENT OPERATIONS ====================

    /// Live like counts grouped by content. Counts are recomputed per
    /// request rather than cached on content rows.
    pub async fn like_counts(&self) -> Result<HashMap<String, i64>, AppError> {
        let rows = sqlx::query("SELECT content_id, COUNT(*) AS n FROM likes GROUP BY content_id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("content_id"), row.get("n")))
            .collect())
    }

    /// Live comment counts grouped by content.
    pub async fn comment_counts(&self) -> Result<HashMap<String, i64>, AppError> {
        let rows =
            sqlx::query("SELECT content_id, COUNT(*) AS n FROM comments GROUP BY content_id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("content_id"), row.get("n")))
            .collect())
    }

    /// Whether the user has liked the content.
    pub async fn is_liked(&self, user_id: &str, content_id: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT 1 FROM likes WHERE user_id = ? AND content_id = ?")
            .bind(user_id)
            .bind(content_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Whether the user has bookmarked the content.
    pub async fn is_bookmarked(&self, user_id: &str, content_id: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT 1 FROM bookmarks WHERE user_id = ? AND content_id = ?")
            .bind(user_id)
            .bind(content_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Toggle a like; returns the resulting liked state.
    pub async fn toggle_like(&self, user_id: &str, content_id: &str) -> Result<bool, AppError> {
        if self.is_liked(user_id, content_id).await? {
            sqlx::query("DELETE FROM likes WHERE user_id = ? AND content_id = ?")
                .bind(user_id)
                .bind(content_id)
                .execute(&self.pool)
                .await?;
            Ok(false)
        } else {
            sqlx::query("INSERT INTO likes (user_id, content_id, created_at) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(content_id)
                .bind(Utc::now().to_rfc3339())
                .execute(&self.pool)
                .await?;
            Ok(true)
        }
    }

    /// Toggle a bookmark; returns the resulting bookmarked state.
    pub async fn toggle_bookmark(&self, user_id: &str, content_id: &str) -> Result<bool, AppError> {
        if self.is_bookmarked(user_id, content_id).await? {
            sqlx::query("DELETE FROM bookmarks WHERE user_id = ? AND content_id = ?")
                .bind(user_id)
                .bind(content_id)
                .execute(&self.pool)
                .await?;
            Ok(false)
        } else {
            sqlx::query("INSERT INTO bookmarks (user_id, content_id, created_at) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(content_id)
                .bind(Utc::now().to_rfc3339())
                .execute(&self.pool)
                .await?;
            Ok(true)
        }
    }

    /// Create a comment.
    pub async fn create_comment(
        &self,
        content_id: &str,
        author_id: &str,
        body: &str,
    ) -> Result<Comment, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO comments (id, content_id, author_id, body, created_at) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(content_id)
        .bind(author_id)
        .bind(body)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Comment {
            id,
            content_id: content_id.to_string(),
            author_id: author_id.to_string(),
            body: body.to_string(),
            created_at: now,
        })
    }

    /// List comments on a content item, oldest first.
    pub async fn list_comments(&self, content_id: &str) -> Result<Vec<Comment>, AppError> {
        let rows = sqlx::query(
            "SELECT id, content_id, author_id, body, created_at FROM comments WHERE content_id = ? ORDER BY created_at"
        )
        .bind(content_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let created_at: String = row.get("created_at");
                Comment {
                    id: row.get("id"),
                    content_id: row.get("content_id"),
                    author_id: row.get("author_id"),
                    body: row.get("body"),
                    created_at: parse_ts(&created_at),
                }
            })
            .collect())
    }

    // ==================== INTEREST OPERATIONS ====================

    /// All interest rows for a user.
    pub async fn list_interests(&self, user_id: &str) -> Result<Vec<UserInterest>, AppError> {
        let rows = sqlx::query(
            "SELECT user_id, tag_id, score, is_auto_subscribed, is_manually_followed, updated_at FROM user_interests WHERE user_id = ?"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(interest_from_row).collect())
    }

    /// Tag ids the user follows, manually or by auto-subscription.
    pub async fn followed_tag_ids(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query(
            "SELECT tag_id FROM user_interests WHERE user_id = ? AND (is_manually_followed = 1 OR is_auto_subscribed = 1)"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| row.get("tag_id")).collect())
    }

    /// Tag ids where the user's affinity exceeds the cutoff.
    pub async fn high_affinity_tag_ids(
        &self,
        user_id: &str,
        cutoff: f64,
    ) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query("SELECT tag_id FROM user_interests WHERE user_id = ? AND score > ?")
            .bind(user_id)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("tag_id")).collect())
    }

    /// Follow or unfollow a tag. Creates the row with the follow seed
    /// score when absent; otherwise only flips the manual flag.
    pub async fn set_follow(
        &self,
        user_id: &str,
        tag_id: &str,
        follow: bool,
    ) -> Result<UserInterest, AppError> {
        let now = Utc::now();
        let existing = sqlx::query(
            "SELECT user_id, tag_id, score, is_auto_subscribed, is_manually_followed, updated_at FROM user_interests WHERE user_id = ? AND tag_id = ?"
        )
        .bind(user_id)
        .bind(tag_id)
        .fetch_optional(&self.pool)
        .await?;

        match existing {
            Some(row) => {
                sqlx::query(
                    "UPDATE user_interests SET is_manually_followed = ?, updated_at = ? WHERE user_id = ? AND tag_id = ?"
                )
                .bind(follow as i32)
                .bind(now.to_rfc3339())
                .bind(user_id)
                .bind(tag_id)
                .execute(&self.pool)
                .await?;

                let mut interest = interest_from_row(&row);
                interest.is_manually_followed = follow;
                interest.updated_at = now;
                Ok(interest)
            }
            None => {
                sqlx::query(
                    "INSERT INTO user_interests (user_id, tag_id, score, is_auto_subscribed, is_manually_followed, updated_at) VALUES (?, ?, ?, 0, ?, ?)"
                )
                .bind(user_id)
                .bind(tag_id)
                .bind(feed::FOLLOW_SEED_SCORE)
                .bind(follow as i32)
                .bind(now.to_rfc3339())
                .execute(&self.pool)
                .await?;

                Ok(UserInterest {
                    user_id: user_id.to_string(),
                    tag_id: tag_id.to_string(),
                    score: feed::FOLLOW_SEED_SCORE,
                    is_auto_subscribed: false,
                    is_manually_followed: follow,
                    updated_at: now,
                })
            }
        }
    }

    /// Record a view and fold it into the viewer's interests, as one
    /// atomic unit: the view event row and every interest update commit
    /// together or not at all.
    pub async fn record_view(
        &self,
        user_id: &str,
        content_id: &str,
        tags: &[Tag],
        view_duration_seconds: i64,
        completion_percent: f64,
    ) -> Result<(), AppError> {
        let now = Utc::now();
        let gain = feed::interest_gain(completion_percent);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO view_events (id, user_id, content_id, view_duration_seconds, completion_percent, created_at) VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(content_id)
        .bind(view_duration_seconds)
        .bind(completion_percent)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for tag in tags {
            let existing = sqlx::query(
                "SELECT score, is_auto_subscribed FROM user_interests WHERE user_id = ? AND tag_id = ?"
            )
            .bind(user_id)
            .bind(&tag.id)
            .fetch_optional(&mut *tx)
            .await?;

            let (old_score, auto_subscribed) = match &existing {
                Some(row) => {
                    let auto: i32 = row.get("is_auto_subscribed");
                    (row.get::<f64, _>("score"), auto != 0)
                }
                None => (0.0, false),
            };

            let new_score = (old_score + gain).min(1.0);
            // One-way latch: never cleared by the view-recording path.
            let new_auto = auto_subscribed || new_score > feed::AUTO_SUBSCRIBE_THRESHOLD;

            if existing.is_some() {
                sqlx::query(
                    "UPDATE user_interests SET score = ?, is_auto_subscribed = ?, updated_at = ? WHERE user_id = ? AND tag_id = ?"
                )
                .bind(new_score)
                .bind(new_auto as i32)
                .bind(now.to_rfc3339())
                .bind(user_id)
                .bind(&tag.id)
                .execute(&mut *tx)
                .await?;
            } else {
                sqlx::query(
                    "INSERT INTO user_interests (user_id, tag_id, score, is_auto_subscribed, is_manually_followed, updated_at) VALUES (?, ?, ?, ?, 0, ?)"
                )
                .bind(user_id)
                .bind(&tag.id)
                .bind(new_score)
                .bind(new_auto as i32)
                .bind(now.to_rfc3339())
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

// Helper functions for row conversion

const CONTENT_COLUMNS: &str = "id, author_id, content_type, title, body, media_url, thumbnail_url, duration_seconds, is_company_important, sharing_policy, comments_enabled, target_roles, created_at, updated_at";

fn prefixed_content_columns() -> String {
    CONTENT_COLUMNS
        .split(", ")
        .map(|c| format!("c.{}", c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    let is_comms_team: i32 = row.get("is_comms_team");
    User {
        id: row.get("id"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        avatar_url: row.get("avatar_url"),
        role: row.get("role"),
        department: row.get("department"),
        is_comms_team: is_comms_team != 0,
    }
}

fn tag_from_row(row: &sqlx::sqlite::SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        category: row.get("category"),
    }
}

fn content_from_row(row: &sqlx::sqlite::SqliteRow) -> Content {
    let content_type: String = row.get("content_type");
    let sharing_policy: String = row.get("sharing_policy");
    let is_company_important: i32 = row.get("is_company_important");
    let comments_enabled: i32 = row.get("comments_enabled");
    let target_roles: Option<String> = row.get("target_roles");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Content {
        id: row.get("id"),
        author_id: row.get("author_id"),
        content_type: ContentType::from_str(&content_type).unwrap_or(ContentType::Text),
        title: row.get("title"),
        body: row.get("body"),
        media_url: row.get("media_url"),
        thumbnail_url: row.get("thumbnail_url"),
        duration_seconds: row.get("duration_seconds"),
        is_company_important: is_company_important != 0,
        sharing_policy: SharingPolicy::from_str(&sharing_policy)
            .unwrap_or(SharingPolicy::InternalOnly),
        comments_enabled: comments_enabled != 0,
        target_roles: target_roles.map(|s| parse_json_array(&s)),
        created_at: parse_ts(&created_at),
        updated_at: parse_ts(&updated_at),
    }
}

fn interest_from_row(row: &sqlx::sqlite::SqliteRow) -> UserInterest {
    let is_auto_subscribed: i32 = row.get("is_auto_subscribed");
    let is_manually_followed: i32 = row.get("is_manually_followed");
    let updated_at: String = row.get("updated_at");
    UserInterest {
        user_id: row.get("user_id"),
        tag_id: row.get("tag_id"),
        score: row.get("score"),
        is_auto_subscribed: is_auto_subscribed != 0,
        is_manually_followed: is_manually_followed != 0,
        updated_at: parse_ts(&updated_at),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
