/// Interest-based user suggestions ("people you might be interested in").
///
/// Derives an interest set from the tags on a user's recently liked and
/// bookmarked posts, then surfaces other users engaged with any of those
/// tags. Purely a read path: storage failures propagate, empty history
/// yields an empty list.
use crate::models::UserSummary;
use anyhow::Result;
use async_trait::async_trait;
use futures::try_join;
use sqlx::PgPool;
use std::collections::{BTreeSet, HashSet};
use uuid::Uuid;

/// Read capability the engine depends on. Handlers inject the Postgres
/// implementation; tests substitute fakes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementReader: Send + Sync {
    /// Tag names of the user's most recently liked posts, newest like
    /// first, at most `limit` posts. One inner list per post.
    async fn liked_post_tags(&self, user_id: Uuid, limit: i64) -> Result<Vec<Vec<String>>>;

    /// Same as `liked_post_tags` for bookmarks. The limit applies to this
    /// relation independently.
    async fn bookmarked_post_tags(&self, user_id: Uuid, limit: i64) -> Result<Vec<Vec<String>>>;

    /// Users with at least one like or at least one bookmark on a post
    /// carrying any of `tags`, excluding `exclude_user`, each user at most
    /// once, at most `limit` rows.
    async fn users_engaged_with_tags(
        &self,
        tags: &[String],
        exclude_user: Uuid,
        limit: i64,
    ) -> Result<Vec<UserSummary>>;
}

/// Tunable policy: how much history to scan and how many users to return.
/// Heuristics, not correctness requirements.
#[derive(Debug, Clone)]
pub struct SuggestionPolicy {
    pub scan_limit: i64,
    pub max_results: usize,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            scan_limit: 10,
            max_results: 4,
        }
    }
}

pub struct SuggestionEngine<R> {
    reader: R,
    policy: SuggestionPolicy,
}

impl<R: EngagementReader> SuggestionEngine<R> {
    pub fn new(reader: R, policy: SuggestionPolicy) -> Self {
        Self { reader, policy }
    }

    /// Suggest up to `max_results` users sharing tag interest with
    /// `user_id`. Never contains the requester, never a duplicate id.
    pub async fn suggest_for(&self, user_id: Uuid) -> Result<Vec<UserSummary>> {
        let limit = self.policy.scan_limit;

        // The two engagement reads are independent of each other.
        let (liked, bookmarked) = try_join!(
            self.reader.liked_post_tags(user_id, limit),
            self.reader.bookmarked_post_tags(user_id, limit),
        )?;

        let interest: BTreeSet<String> =
            liked.into_iter().chain(bookmarked).flatten().collect();

        // Empty interest set matches nothing; skip the candidate query
        // entirely rather than hand storage an empty membership filter.
        if interest.is_empty() {
            return Ok(Vec::new());
        }

        let tags: Vec<String> = interest.into_iter().collect();
        let candidates = self
            .reader
            .users_engaged_with_tags(&tags, user_id, self.policy.max_results as i64)
            .await?;

        // The reader already excludes the requester and deduplicates, but
        // both invariants are cheap to enforce here and the contract of
        // this operation, not of the storage layer.
        let mut seen: HashSet<Uuid> = HashSet::new();
        let mut suggestions = Vec::with_capacity(self.policy.max_results);
        for user in candidates {
            if user.id == user_id || !seen.insert(user.id) {
                continue;
            }
            suggestions.push(user);
            if suggestions.len() == self.policy.max_results {
                break;
            }
        }

        Ok(suggestions)
    }
}

/// Postgres-backed reader.
#[derive(Clone)]
pub struct PgEngagementReader {
    pool: PgPool,
}

impl PgEngagementReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EngagementReader for PgEngagementReader {
    async fn liked_post_tags(&self, user_id: Uuid, limit: i64) -> Result<Vec<Vec<String>>> {
        let rows: Vec<Vec<String>> = sqlx::query_scalar(
            r#"
            SELECT COALESCE(array_agg(t.name) FILTER (WHERE t.name IS NOT NULL), '{}') AS tags
            FROM likes l
            LEFT JOIN post_tags pt ON pt.post_id = l.post_id
            LEFT JOIN tags t ON t.id = pt.tag_id
            WHERE l.user_id = $1
            GROUP BY l.post_id, l.created_at
            ORDER BY l.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn bookmarked_post_tags(&self, user_id: Uuid, limit: i64) -> Result<Vec<Vec<String>>> {
        let rows: Vec<Vec<String>> = sqlx::query_scalar(
            r#"
            SELECT COALESCE(array_agg(t.name) FILTER (WHERE t.name IS NOT NULL), '{}') AS tags
            FROM bookmarks b
            LEFT JOIN post_tags pt ON pt.post_id = b.post_id
            LEFT JOIN tags t ON t.id = pt.tag_id
            WHERE b.user_id = $1
            GROUP BY b.post_id, b.created_at
            ORDER BY b.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn users_engaged_with_tags(
        &self,
        tags: &[String],
        exclude_user: Uuid,
        limit: i64,
    ) -> Result<Vec<UserSummary>> {
        // Selecting from users directly keeps each candidate unique even
        // when both relations match; ordering by account creation keeps
        // the result deterministic for a given snapshot.
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.name, u.username, u.avatar_url
            FROM users u
            WHERE u.id <> $2
              AND (
                EXISTS (
                    SELECT 1 FROM likes l
                    JOIN post_tags pt ON pt.post_id = l.post_id
                    JOIN tags t ON t.id = pt.tag_id
                    WHERE l.user_id = u.id AND t.name = ANY($1)
                )
                OR EXISTS (
                    SELECT 1 FROM bookmarks b
                    JOIN post_tags pt ON pt.post_id = b.post_id
                    JOIN tags t ON t.id = pt.tag_id
                    WHERE b.user_id = u.id AND t.name = ANY($1)
                )
              )
            ORDER BY u.created_at
            LIMIT $3
            "#,
        )
        .bind(tags)
        .bind(exclude_user)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn summary(id: Uuid, username: &str) -> UserSummary {
        UserSummary {
            id,
            name: username.to_uppercase(),
            username: username.to_string(),
            avatar_url: None,
        }
    }

    fn engine(reader: MockEngagementReader) -> SuggestionEngine<MockEngagementReader> {
        SuggestionEngine::new(reader, SuggestionPolicy::default())
    }

    #[tokio::test]
    async fn empty_history_yields_empty_list_without_candidate_query() {
        let requester = Uuid::new_v4();
        let mut reader = MockEngagementReader::new();
        reader
            .expect_liked_post_tags()
            .with(eq(requester), eq(10))
            .returning(|_, _| Ok(Vec::new()));
        reader
            .expect_bookmarked_post_tags()
            .with(eq(requester), eq(10))
            .returning(|_, _| Ok(Vec::new()));
        // No expectation on users_engaged_with_tags: calling it would panic.

        let result = engine(reader).suggest_for(requester).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn untagged_engagements_also_yield_empty_list() {
        let requester = Uuid::new_v4();
        let mut reader = MockEngagementReader::new();
        reader
            .expect_liked_post_tags()
            .returning(|_, _| Ok(vec![vec![], vec![]]));
        reader
            .expect_bookmarked_post_tags()
            .returning(|_, _| Ok(vec![vec![]]));

        let result = engine(reader).suggest_for(requester).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn interest_set_is_deduplicated_union_of_both_relations() {
        let requester = Uuid::new_v4();
        let other = summary(Uuid::new_v4(), "other");
        let expected = other.clone();

        let mut reader = MockEngagementReader::new();
        reader
            .expect_liked_post_tags()
            .returning(|_, _| Ok(vec![vec!["rust".into(), "web".into()], vec!["rust".into()]]));
        reader
            .expect_bookmarked_post_tags()
            .returning(|_, _| Ok(vec![vec!["go".into(), "web".into()]]));
        reader
            .expect_users_engaged_with_tags()
            .withf(move |tags, exclude, limit| {
                tags == ["go".to_string(), "rust".to_string(), "web".to_string()]
                    && *exclude == requester
                    && *limit == 4
            })
            .returning(move |_, _, _| Ok(vec![other.clone()]));

        let result = engine(reader).suggest_for(requester).await.unwrap();
        assert_eq!(result, vec![expected]);
    }

    #[tokio::test]
    async fn requester_is_never_suggested() {
        let requester = Uuid::new_v4();
        let me = summary(requester, "me");
        let other = summary(Uuid::new_v4(), "other");
        let expected = other.clone();

        let mut reader = MockEngagementReader::new();
        reader
            .expect_liked_post_tags()
            .returning(|_, _| Ok(vec![vec!["rust".into()]]));
        reader
            .expect_bookmarked_post_tags()
            .returning(|_, _| Ok(Vec::new()));
        // A reader that fails to exclude the requester is still filtered.
        reader
            .expect_users_engaged_with_tags()
            .returning(move |_, _, _| Ok(vec![me.clone(), other.clone()]));

        let result = engine(reader).suggest_for(requester).await.unwrap();
        assert_eq!(result, vec![expected]);
    }

    #[tokio::test]
    async fn duplicate_candidates_collapse_to_one() {
        let requester = Uuid::new_v4();
        let both_relations = summary(Uuid::new_v4(), "both");
        let dup = both_relations.clone();

        let mut reader = MockEngagementReader::new();
        reader
            .expect_liked_post_tags()
            .returning(|_, _| Ok(vec![vec!["rust".into()]]));
        reader
            .expect_bookmarked_post_tags()
            .returning(|_, _| Ok(Vec::new()));
        reader
            .expect_users_engaged_with_tags()
            .returning(move |_, _, _| Ok(vec![both_relations.clone(), both_relations.clone()]));

        let result = engine(reader).suggest_for(requester).await.unwrap();
        assert_eq!(result, vec![dup]);
    }

    #[tokio::test]
    async fn result_is_capped_at_max_results() {
        let requester = Uuid::new_v4();
        let candidates: Vec<UserSummary> = (0..6)
            .map(|i| summary(Uuid::new_v4(), &format!("user{i}")))
            .collect();
        let returned = candidates.clone();

        let mut reader = MockEngagementReader::new();
        reader
            .expect_liked_post_tags()
            .returning(|_, _| Ok(vec![vec!["rust".into()]]));
        reader
            .expect_bookmarked_post_tags()
            .returning(|_, _| Ok(Vec::new()));
        reader
            .expect_users_engaged_with_tags()
            .returning(move |_, _, _| Ok(returned.clone()));

        let result = engine(reader).suggest_for(requester).await.unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(result, candidates[..4].to_vec());
    }

    #[tokio::test]
    async fn storage_failure_propagates() {
        let requester = Uuid::new_v4();
        let mut reader = MockEngagementReader::new();
        reader
            .expect_liked_post_tags()
            .returning(|_, _| Err(anyhow::anyhow!("connection reset")));
        reader
            .expect_bookmarked_post_tags()
            .returning(|_, _| Ok(Vec::new()));

        let result = engine(reader).suggest_for(requester).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn reads_are_not_cached_across_calls() {
        let requester = Uuid::new_v4();
        let other = summary(Uuid::new_v4(), "other");

        let mut reader = MockEngagementReader::new();
        let mut like_calls = 0;
        reader.expect_liked_post_tags().returning(move |_, _| {
            like_calls += 1;
            if like_calls == 1 {
                Ok(vec![vec!["rust".into()]])
            } else {
                // The only qualifying like was deleted between calls.
                Ok(Vec::new())
            }
        });
        reader
            .expect_bookmarked_post_tags()
            .returning(|_, _| Ok(Vec::new()));
        reader
            .expect_users_engaged_with_tags()
            .times(1)
            .returning(move |_, _, _| Ok(vec![other.clone()]));

        let engine = engine(reader);
        assert_eq!(engine.suggest_for(requester).await.unwrap().len(), 1);
        assert!(engine.suggest_for(requester).await.unwrap().is_empty());
    }
}
