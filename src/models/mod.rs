use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - created by the upstream identity provider on first sign-in
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub body: String,
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Tag entity - immutable once created
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Like entity - unique per (user, post)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Bookmark entity - unique per (user, post)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Comment entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Lightweight user projection returned by the suggestion engine and
/// embedded wherever an author/commenter is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub avatar_url: Option<String>,
}

/// Tag projection embedded in post views
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Post as rendered in the main feed and on user pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListItem {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: UserSummary,
    pub tags: Vec<TagSummary>,
    pub like_count: i64,
    pub comment_count: i64,
    /// Set for authenticated callers, absent otherwise
    pub liked: Option<bool>,
    pub bookmarked: Option<bool>,
}

/// Full post view for the post page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub body: String,
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: UserSummary,
    pub tags: Vec<TagSummary>,
    pub like_count: i64,
    pub liked: Option<bool>,
    pub bookmarked: Option<bool>,
}

/// Comment with its author, for the comment sidebar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
}

/// A bookmarked post in the caller's reading list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingListEntry {
    pub bookmark_id: Uuid,
    pub bookmarked_at: DateTime<Utc>,
    pub post: ReadingListPost,
}

/// Compact post card rendered inside the reading list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingListPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: UserSummary,
}

/// Public profile header for a user page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub post_count: i64,
}
