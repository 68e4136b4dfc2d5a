use crate::models::Bookmark;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Flat row for the reading list: bookmark joined with post and author.
#[derive(Debug, sqlx::FromRow)]
pub struct ReadingListRow {
    pub bookmark_id: Uuid,
    pub bookmarked_at: DateTime<Utc>,
    pub post_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_username: String,
    pub author_avatar_url: Option<String>,
}

/// Repository for Bookmark operations
#[derive(Clone)]
pub struct BookmarkRepository {
    pool: PgPool,
}

impl BookmarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a bookmark; a duplicate pair surfaces as a unique violation.
    pub async fn insert_bookmark(&self, user_id: Uuid, post_id: Uuid) -> Result<Bookmark> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (id, user_id, post_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, post_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(bookmark)
    }

    /// Delete a bookmark by (user, post) pair; returns true if a row matched.
    pub async fn delete_bookmark(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM bookmarks
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check if user has bookmarked a post
    pub async fn check_user_bookmarked(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookmarks
                WHERE user_id = $1 AND post_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Most recent bookmarks for a user with post and author, newest first.
    pub async fn reading_list(&self, user_id: Uuid, limit: i64) -> Result<Vec<ReadingListRow>> {
        let rows = sqlx::query_as::<_, ReadingListRow>(
            r#"
            SELECT b.id AS bookmark_id,
                   b.created_at AS bookmarked_at,
                   p.id AS post_id,
                   p.title,
                   p.slug,
                   p.description,
                   p.featured_image,
                   p.created_at,
                   u.id AS author_id,
                   u.name AS author_name,
                   u.username AS author_username,
                   u.avatar_url AS author_avatar_url
            FROM bookmarks b
            JOIN posts p ON p.id = b.post_id
            JOIN users u ON u.id = p.author_id
            WHERE b.user_id = $1
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
}
