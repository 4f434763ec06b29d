//! Feed ranking and interest learning.
//!
//! Pure functions only: scoring, candidate ranking, cursor pagination and
//! the per-view affinity gain. All database access lives in the repository;
//! handlers wire the two together.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{Content, Tag, User};

/// Flat boost for content marked company-important.
pub const COMPANY_IMPORTANT_BOOST: f64 = 1000.0;
/// Boost when the viewer's role is in the content's target roles.
pub const ROLE_MATCH_BOOST: f64 = 100.0;
/// Smaller universal boost for untargeted (broadcast) content.
pub const BROADCAST_BOOST: f64 = 50.0;
/// Per-tag weight applied to the viewer's affinity.
pub const TAG_INTEREST_WEIGHT: f64 = 50.0;
/// Weight of the undecayed engagement term.
pub const ENGAGEMENT_WEIGHT: f64 = 10.0;
/// Recency half-life in hours.
pub const RECENCY_HALF_LIFE_HOURS: f64 = 24.0;

/// Affinity gained by one fully-watched view.
pub const MAX_GAIN_PER_VIEW: f64 = 0.1;
/// Affinity above which a tag is auto-subscribed.
pub const AUTO_SUBSCRIBE_THRESHOLD: f64 = 0.7;
/// Seed affinity when a follow creates the interest row.
pub const FOLLOW_SEED_SCORE: f64 = 0.5;
/// Affinity above which a tag is considered over-familiar for discovery.
pub const DISCOVER_AFFINITY_CUTOFF: f64 = 0.5;

/// Compute the ranking score for one candidate.
///
/// Importance, targeting and tag-affinity terms decay with content age;
/// the engagement term is added afterwards so old-but-popular content
/// keeps a visibility floor. Scores are only meaningful relative to each
/// other within a single ranking pass.
pub fn feed_score(
    content: &Content,
    viewer: &User,
    tags: &[Tag],
    interests: &HashMap<String, f64>,
    like_count: i64,
    comment_count: i64,
    now: DateTime<Utc>,
) -> f64 {
    let mut score = 0.0;

    if content.is_company_important {
        score += COMPANY_IMPORTANT_BOOST;
    }

    match &content.target_roles {
        Some(roles) if !roles.is_empty() => {
            if roles.iter().any(|r| r == &viewer.role) {
                score += ROLE_MATCH_BOOST;
            }
        }
        _ => score += BROADCAST_BOOST,
    }

    for tag in tags {
        let affinity = interests.get(&tag.id).copied().unwrap_or(0.0);
        score += TAG_INTEREST_WEIGHT * affinity;
    }

    score *= recency_decay(age_hours(content.created_at, now));

    let engagement = (like_count + comment_count) as f64;
    score + ENGAGEMENT_WEIGHT * engagement.sqrt()
}

/// Content age in hours relative to `now`.
fn age_hours(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - created_at).num_milliseconds() as f64 / 3_600_000.0
}

/// Exponential decay multiplier with a 24 hour half-life. Ages at or
/// below zero map to full freshness.
pub fn recency_decay(age_hours: f64) -> f64 {
    if age_hours <= 0.0 {
        return 1.0;
    }
    0.5_f64.powf(age_hours / RECENCY_HALF_LIFE_HOURS)
}

/// Affinity gained from a view, scaled by how much was watched.
pub fn interest_gain(completion_percent: f64) -> f64 {
    (completion_percent / 100.0).min(1.0).max(0.0) * MAX_GAIN_PER_VIEW
}

/// A scored candidate in ranked order.
#[derive(Debug, Clone)]
pub struct RankedContent {
    pub content: Content,
    pub score: f64,
}

/// Score and sort the candidate set for the personalized feed.
///
/// Order is score descending with deterministic tie-breaks (created_at
/// descending, then id) so cursor pagination over a recomputed ranking
/// stays stable while the candidate set does not change.
pub fn rank_candidates(
    candidates: Vec<Content>,
    tags_by_content: &HashMap<String, Vec<Tag>>,
    viewer: &User,
    interests: &HashMap<String, f64>,
    like_counts: &HashMap<String, i64>,
    comment_counts: &HashMap<String, i64>,
    now: DateTime<Utc>,
) -> Vec<RankedContent> {
    static NO_TAGS: &[Tag] = &[];

    let mut ranked: Vec<RankedContent> = candidates
        .into_iter()
        .map(|content| {
            let tags = tags_by_content
                .get(&content.id)
                .map(|t| t.as_slice())
                .unwrap_or(NO_TAGS);
            let likes = like_counts.get(&content.id).copied().unwrap_or(0);
            let comments = comment_counts.get(&content.id).copied().unwrap_or(0);
            let score = feed_score(&content, viewer, tags, interests, likes, comments, now);
            RankedContent { content, score }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.content.created_at.cmp(&a.content.created_at))
            .then_with(|| a.content.id.cmp(&b.content.id))
    });

    ranked
}

/// One page sliced out of a ranked list.
#[derive(Debug)]
pub struct RankedPage {
    pub items: Vec<RankedContent>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Slice a page out of the ranked list using an id cursor.
///
/// The cursor is the id of the last item on the previous page; the page
/// resumes after its position in the freshly recomputed ranking. A cursor
/// that no longer matches anything degrades to the start of the list so
/// stale client state never errors.
pub fn paginate_ranked(
    ranked: &[RankedContent],
    cursor: Option<&str>,
    limit: usize,
) -> RankedPage {
    let start = match cursor {
        Some(id) => ranked
            .iter()
            .position(|rc| rc.content.id == id)
            .map(|idx| idx + 1)
            .unwrap_or(0),
        None => 0,
    };

    let end = (start + limit).min(ranked.len());
    let items: Vec<RankedContent> = ranked[start..end].to_vec();
    let has_more = end < ranked.len();
    let next_cursor = if has_more {
        items.last().map(|rc| rc.content.id.clone())
    } else {
        None
    };

    RankedPage {
        items,
        next_cursor,
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::models::{ContentType, SharingPolicy};

    fn test_user(role: &str) -> User {
        User {
            id: "user-1".to_string(),
            email: "viewer@example.com".to_string(),
            display_name: "Viewer".to_string(),
            avatar_url: None,
            role: role.to_string(),
            department: "Engineering".to_string(),
            is_comms_team: false,
        }
    }

    fn test_content(id: &str, created_at: DateTime<Utc>) -> Content {
        Content {
            id: id.to_string(),
            author_id: "author-1".to_string(),
            content_type: ContentType::Text,
            title: None,
            body: None,
            media_url: None,
            thumbnail_url: None,
            duration_seconds: None,
            is_company_important: false,
            sharing_policy: SharingPolicy::InternalOnly,
            comments_enabled: true,
            target_roles: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn test_tag(id: &str) -> Tag {
        Tag {
            id: id.to_string(),
            name: id.to_string(),
            slug: id.to_string(),
            category: None,
        }
    }

    #[test]
    fn test_recency_decay_curve() {
        assert_eq!(recency_decay(0.0), 1.0);
        assert_eq!(recency_decay(-5.0), 1.0);
        assert!((recency_decay(24.0) - 0.5).abs() < 1e-9);
        // One week old is roughly a tenth.
        assert!((recency_decay(168.0) - 0.0078125).abs() < 1e-6);

        let mut prev = recency_decay(0.5);
        for h in 1..200 {
            let cur = recency_decay(h as f64);
            assert!(cur < prev, "decay must be strictly decreasing at {}h", h);
            prev = cur;
        }
    }

    #[test]
    fn test_score_company_important_untagged_broadcast() {
        // 1000 + 50 broadcast, fresh, no engagement = 1050.
        let now = Utc::now();
        let mut content = test_content("c1", now);
        content.is_company_important = true;

        let score = feed_score(
            &content,
            &test_user("engineering"),
            &[],
            &HashMap::new(),
            0,
            0,
            now,
        );
        assert!((score - 1050.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_role_match_with_tags_and_engagement() {
        // (100 + 50*0.4 + 50*0.4) * 0.5 + 10*sqrt(5) ~= 92.36
        let now = Utc::now();
        let mut content = test_content("c1", now - Duration::hours(24));
        content.target_roles = Some(vec!["engineering".to_string()]);

        let tags = vec![test_tag("t1"), test_tag("t2")];
        let mut interests = HashMap::new();
        interests.insert("t1".to_string(), 0.4);
        interests.insert("t2".to_string(), 0.4);

        let score = feed_score(
            &content,
            &test_user("engineering"),
            &tags,
            &interests,
            4,
            1,
            now,
        );
        let expected = 140.0 * 0.5 + 10.0 * 5.0_f64.sqrt();
        assert!((score - expected).abs() < 1e-6);
    }

    #[test]
    fn test_score_role_mismatch_gets_no_targeting_term() {
        let now = Utc::now();
        let mut content = test_content("c1", now);
        content.target_roles = Some(vec!["hr".to_string()]);

        let score = feed_score(
            &content,
            &test_user("engineering"),
            &[],
            &HashMap::new(),
            0,
            0,
            now,
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_score_unknown_tag_affinity_defaults_to_zero() {
        let now = Utc::now();
        let content = test_content("c1", now);
        let tags = vec![test_tag("t1")];

        let score = feed_score(
            &content,
            &test_user("engineering"),
            &tags,
            &HashMap::new(),
            0,
            0,
            now,
        );
        // Broadcast boost only.
        assert!((score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_engagement_term_not_decayed() {
        let now = Utc::now();
        // Old enough that the decayed terms are negligible.
        let content = test_content("c1", now - Duration::days(365));

        let score = feed_score(
            &content,
            &test_user("engineering"),
            &[],
            &HashMap::new(),
            9,
            0,
            now,
        );
        assert!((score - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_fresh_company_important_dominates() {
        let now = Utc::now();
        let mut content = test_content("c1", now - Duration::hours(1));
        content.is_company_important = true;
        // Targeted at a role the viewer lacks: no other decayed term.
        content.target_roles = Some(vec!["hr".to_string()]);

        let score = feed_score(
            &content,
            &test_user("engineering"),
            &[],
            &HashMap::new(),
            0,
            0,
            now,
        );
        assert!(score >= 1000.0 * recency_decay(1.0) - 1e-9);
    }

    #[test]
    fn test_interest_gain() {
        assert!((interest_gain(100.0) - 0.1).abs() < 1e-12);
        assert!((interest_gain(50.0) - 0.05).abs() < 1e-12);
        assert_eq!(interest_gain(0.0), 0.0);
        // Over-reported completion is capped.
        assert!((interest_gain(250.0) - 0.1).abs() < 1e-12);
        assert_eq!(interest_gain(-10.0), 0.0);
    }

    #[test]
    fn test_rank_ties_broken_by_recency_then_id() {
        let now = Utc::now();
        let older = test_content("a", now - Duration::hours(2));
        let newer = test_content("b", now - Duration::hours(1));
        let newer_twin = test_content("c", now - Duration::hours(1));

        // Equal scores: all broadcast, no tags, no engagement, but ages
        // differ so force score equality by zeroing the decayed terms.
        let mut candidates = vec![older, newer, newer_twin];
        for c in &mut candidates {
            c.target_roles = Some(vec!["hr".to_string()]);
        }

        let ranked = rank_candidates(
            candidates,
            &HashMap::new(),
            &test_user("engineering"),
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
            now,
        );

        let order: Vec<&str> = ranked.iter().map(|rc| rc.content.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_paginate_pages_are_disjoint_and_complete() {
        let now = Utc::now();
        let candidates: Vec<Content> = (0..7)
            .map(|i| test_content(&format!("c{}", i), now - Duration::hours(i)))
            .collect();

        let ranked = rank_candidates(
            candidates,
            &HashMap::new(),
            &test_user("engineering"),
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
            now,
        );

        let first = paginate_ranked(&ranked, None, 3);
        assert_eq!(first.items.len(), 3);
        assert!(first.has_more);
        let cursor = first.next_cursor.clone().unwrap();

        let second = paginate_ranked(&ranked, Some(&cursor), 3);
        assert_eq!(second.items.len(), 3);
        assert!(second.has_more);

        let third = paginate_ranked(&ranked, second.next_cursor.as_deref(), 3);
        assert_eq!(third.items.len(), 1);
        assert!(!third.has_more);
        assert!(third.next_cursor.is_none());

        let mut seen: Vec<String> = Vec::new();
        for page in [&first, &second, &third] {
            for rc in &page.items {
                assert!(!seen.contains(&rc.content.id), "duplicate across pages");
                seen.push(rc.content.id.clone());
            }
        }
        let full: Vec<String> = ranked.iter().map(|rc| rc.content.id.clone()).collect();
        assert_eq!(seen, full);
    }

    #[test]
    fn test_paginate_unmatched_cursor_restarts() {
        let now = Utc::now();
        let candidates: Vec<Content> = (0..3)
            .map(|i| test_content(&format!("c{}", i), now - Duration::hours(i)))
            .collect();
        let ranked = rank_candidates(
            candidates,
            &HashMap::new(),
            &test_user("engineering"),
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
            now,
        );

        let page = paginate_ranked(&ranked, Some("deleted-id"), 2);
        assert_eq!(page.items[0].content.id, ranked[0].content.id);
        assert!(page.has_more);
    }

    #[test]
    fn test_paginate_exact_boundary_has_no_more() {
        let now = Utc::now();
        let candidates: Vec<Content> = (0..4)
            .map(|i| test_content(&format!("c{}", i), now - Duration::hours(i)))
            .collect();
        let ranked = rank_candidates(
            candidates,
            &HashMap::new(),
            &test_user("engineering"),
            &HashMap::new(),
            &HashMap::new(),
            &HashMap::new(),
            now,
        );

        let first = paginate_ranked(&ranked, None, 2);
        assert!(first.has_more);
        let second = paginate_ranked(&ranked, first.next_cursor.as_deref(), 2);
        assert_eq!(second.items.len(), 2);
        assert!(!second.has_more);
        assert!(second.next_cursor.is_none());
    }
}
