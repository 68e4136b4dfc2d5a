/// Post workflows: creation with slug + duplicate-title handling, feed and
/// detail assembly, reading list, featured-image updates.
use crate::error::{AppError, Result};
use crate::models::{
    Post, PostDetail, PostListItem, ReadingListEntry, ReadingListPost, TagSummary, UserSummary,
};
use crate::repository::posts::PostFeedRow;
use crate::repository::{BookmarkRepository, PostRepository, TagRepository};
use crate::utils::slugify;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostService {
    posts: PostRepository,
    tags: TagRepository,
    bookmarks: BookmarkRepository,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            posts: PostRepository::new(pool.clone()),
            tags: TagRepository::new(pool.clone()),
            bookmarks: BookmarkRepository::new(pool),
        }
    }

    /// Create a post. Titles are unique; a duplicate is a conflict, checked
    /// up front so the caller gets a clear message rather than a raw
    /// constraint violation.
    pub async fn create_post(
        &self,
        author_id: Uuid,
        title: &str,
        description: &str,
        body: &str,
        tag_ids: &[Uuid],
    ) -> Result<Post> {
        if self.posts.title_exists(title).await? {
            return Err(AppError::Conflict(
                "post with this title already exists".to_string(),
            ));
        }

        let slug = slugify(title);
        if slug.is_empty() {
            return Err(AppError::Validation("title produces an empty slug".to_string()));
        }

        let post = self
            .posts
            .insert_post(author_id, title, &slug, description, body)
            .await?;

        self.tags.attach_to_post(post.id, tag_ids).await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "post created");
        Ok(post)
    }

    /// Main feed, newest first.
    pub async fn feed(&self, viewer: Option<Uuid>) -> Result<Vec<PostListItem>> {
        let rows = self.posts.list_recent(viewer).await?;
        self.assemble_list(rows, viewer).await
    }

    /// A single post page by slug.
    pub async fn post_by_slug(&self, slug: &str, viewer: Option<Uuid>) -> Result<PostDetail> {
        let row = self
            .posts
            .find_feed_row_by_slug(slug, viewer)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post '{slug}' not found")))?;

        let mut tags_by_post = self.tags.tags_for_posts(&[row.id]).await?;
        let tags = tags_by_post.remove(&row.id).unwrap_or_default();

        Ok(PostDetail {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            body: row.body,
            featured_image: row.featured_image,
            created_at: row.created_at,
            author: UserSummary {
                id: row.author_id,
                name: row.author_name,
                username: row.author_username,
                avatar_url: row.author_avatar_url,
            },
            tags,
            like_count: row.like_count,
            liked: viewer.map(|_| row.liked),
            bookmarked: viewer.map(|_| row.bookmarked),
        })
    }

    /// Posts authored by a given user, newest first.
    pub async fn posts_by_author(
        &self,
        author_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Vec<PostListItem>> {
        let rows = self.posts.list_by_author(author_id, viewer).await?;
        self.assemble_list(rows, viewer).await
    }

    /// The caller's most recently bookmarked posts.
    pub async fn reading_list(&self, user_id: Uuid, limit: i64) -> Result<Vec<ReadingListEntry>> {
        let rows = self.bookmarks.reading_list(user_id, limit).await?;

        Ok(rows
            .into_iter()
            .map(|row| ReadingListEntry {
                bookmark_id: row.bookmark_id,
                bookmarked_at: row.bookmarked_at,
                post: ReadingListPost {
                    id: row.post_id,
                    title: row.title,
                    slug: row.slug,
                    description: row.description,
                    featured_image: row.featured_image,
                    created_at: row.created_at,
                    author: UserSummary {
                        id: row.author_id,
                        name: row.author_name,
                        username: row.author_username,
                        avatar_url: row.author_avatar_url,
                    },
                },
            })
            .collect())
    }

    /// Set a post's featured image. Only the author may do this.
    pub async fn set_featured_image(
        &self,
        caller: Uuid,
        post_id: Uuid,
        image_url: &str,
    ) -> Result<()> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} not found")))?;

        if post.author_id != caller {
            return Err(AppError::Forbidden(
                "only the author can update the featured image".to_string(),
            ));
        }

        self.posts.update_featured_image(post_id, image_url).await?;
        Ok(())
    }

    /// Look up a post or fail with 404; shared by the engagement handlers.
    pub async fn require_post(&self, post_id: Uuid) -> Result<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} not found")))
    }

    async fn assemble_list(
        &self,
        rows: Vec<PostFeedRow>,
        viewer: Option<Uuid>,
    ) -> Result<Vec<PostListItem>> {
        let post_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut tags_by_post: HashMap<Uuid, Vec<TagSummary>> =
            self.tags.tags_for_posts(&post_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| PostListItem {
                tags: tags_by_post.remove(&row.id).unwrap_or_default(),
                id: row.id,
                title: row.title,
                slug: row.slug,
                description: row.description,
                featured_image: row.featured_image,
                created_at: row.created_at,
                author: UserSummary {
                    id: row.author_id,
                    name: row.author_name,
                    username: row.author_username,
                    avatar_url: row.author_avatar_url,
                },
                like_count: row.like_count,
                comment_count: row.comment_count,
                liked: viewer.map(|_| row.liked),
                bookmarked: viewer.map(|_| row.bookmarked),
            })
            .collect())
    }
}
