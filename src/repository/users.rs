use crate::models::{User, UserProfile};
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for User reads. Users are created by the upstream identity
/// provider; this service never inserts or deletes them.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by their unique username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, username, avatar_url, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Public profile header: user plus authored post count.
    pub async fn profile(&self, username: &str) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT u.id,
                   u.name,
                   u.username,
                   u.avatar_url,
                   (SELECT COUNT(*) FROM posts p WHERE p.author_id = u.id) AS post_count
            FROM users u
            WHERE u.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile.map(|row| UserProfile {
            id: row.id,
            name: row.name,
            username: row.username,
            avatar_url: row.avatar_url,
            post_count: row.post_count,
        }))
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    name: String,
    username: String,
    avatar_url: Option<String>,
    post_count: i64,
}
