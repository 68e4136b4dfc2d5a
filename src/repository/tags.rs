use crate::models::{Tag, TagSummary};
use anyhow::Result;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

/// Repository for Tag operations
#[derive(Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All tags (small, unbounded table in practice)
    pub async fn list(&self) -> Result<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, slug
            FROM tags
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    /// Find a tag by its unique name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, slug
            FROM tags
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tag)
    }

    /// Insert a new tag; duplicates surface as unique violations.
    pub async fn insert_tag(&self, name: &str, slug: &str) -> Result<Tag> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (id, name, slug)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(tag)
    }

    /// Attach tags to a post. Unknown tag ids violate the foreign key and
    /// surface as a database error.
    pub async fn attach_to_post(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO post_tags (post_id, tag_id)
            SELECT $1::uuid, tag_id FROM UNNEST($2::uuid[]) AS t(tag_id)
            ON CONFLICT (post_id, tag_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(tag_ids)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Batch fetch tags for a set of posts, keyed by post id.
    pub async fn tags_for_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<TagSummary>>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT pt.post_id, t.id, t.name, t.slug
            FROM post_tags pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_post: HashMap<Uuid, Vec<TagSummary>> = HashMap::new();
        for row in rows {
            let post_id: Uuid = row.try_get("post_id")?;
            by_post.entry(post_id).or_default().push(TagSummary {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                slug: row.try_get("slug")?,
            });
        }

        Ok(by_post)
    }
}
