use crate::models::Post;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Flat feed row: post joined with author plus engagement counts and the
/// caller's like/bookmark flags. `viewer` binds NULL for anonymous callers,
/// which makes both EXISTS checks false.
#[derive(Debug, sqlx::FromRow)]
pub struct PostFeedRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub body: String,
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_username: String,
    pub author_avatar_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked: bool,
    pub bookmarked: bool,
}

const FEED_SELECT: &str = r#"
SELECT p.id,
       p.title,
       p.slug,
       p.description,
       p.body,
       p.featured_image,
       p.created_at,
       u.id AS author_id,
       u.name AS author_name,
       u.username AS author_username,
       u.avatar_url AS author_avatar_url,
       (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
       (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
       EXISTS(SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = $1) AS liked,
       EXISTS(SELECT 1 FROM bookmarks b WHERE b.post_id = p.id AND b.user_id = $1) AS bookmarked
FROM posts p
JOIN users u ON u.id = p.author_id
"#;

/// Repository for Post operations
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a post with this exact title already exists.
    pub async fn title_exists(&self, title: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM posts
                WHERE title = $1
            )
            "#,
        )
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert a new post
    pub async fn insert_post(
        &self,
        author_id: Uuid,
        title: &str,
        slug: &str,
        description: &str,
        body: &str,
    ) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, author_id, title, slug, description, body)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, author_id, title, slug, description, body, featured_image, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(author_id)
        .bind(title)
        .bind(slug)
        .bind(description)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    /// Find a post by ID
    pub async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_id, title, slug, description, body, featured_image, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// All posts, newest first, with author and the viewer's flags.
    pub async fn list_recent(&self, viewer: Option<Uuid>) -> Result<Vec<PostFeedRow>> {
        let sql = format!("{FEED_SELECT} ORDER BY p.created_at DESC");
        let rows = sqlx::query_as::<_, PostFeedRow>(&sql)
            .bind(viewer)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// A single post by slug, with author and the viewer's flags.
    pub async fn find_feed_row_by_slug(
        &self,
        slug: &str,
        viewer: Option<Uuid>,
    ) -> Result<Option<PostFeedRow>> {
        let sql = format!("{FEED_SELECT} WHERE p.slug = $2");
        let row = sqlx::query_as::<_, PostFeedRow>(&sql)
            .bind(viewer)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Posts authored by a user, newest first, with the viewer's flags.
    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Vec<PostFeedRow>> {
        let sql = format!("{FEED_SELECT} WHERE p.author_id = $2 ORDER BY p.created_at DESC");
        let rows = sqlx::query_as::<_, PostFeedRow>(&sql)
            .bind(viewer)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Set the featured image of a post
    pub async fn update_featured_image(&self, post_id: Uuid, image_url: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET featured_image = $2
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .bind(image_url)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
