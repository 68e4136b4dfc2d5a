/// Post handlers - HTTP endpoints for posts, engagement, and comments
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::middleware::{MaybeUserId, UserId};
use crate::models::{CommentView, UserSummary};
use crate::repository::{BookmarkRepository, CommentRepository, LikeRepository};
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub description: String,
    pub body: String,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFeaturedImageRequest {
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub body: String,
}

/// Create a new post
pub async fn create_post(
    service: web::Data<PostService>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    if req.body.trim().is_empty() {
        return Err(AppError::Validation("body must not be empty".to_string()));
    }

    let post = service
        .create_post(
            user_id.0,
            req.title.trim(),
            &req.description,
            &req.body,
            &req.tag_ids,
        )
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// The main feed, newest first
pub async fn list_posts(
    service: web::Data<PostService>,
    viewer: MaybeUserId,
) -> Result<HttpResponse> {
    let posts = service.feed(viewer.0).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// A single post by slug
pub async fn get_post(
    service: web::Data<PostService>,
    slug: web::Path<String>,
    viewer: MaybeUserId,
) -> Result<HttpResponse> {
    let post = service.post_by_slug(&slug, viewer.0).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Set the featured image of an owned post
pub async fn update_featured_image(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdateFeaturedImageRequest>,
) -> Result<HttpResponse> {
    service
        .set_featured_image(user_id.0, *post_id, &req.image_url)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Like a post. Liking twice is a conflict.
pub async fn like_post(
    likes: web::Data<LikeRepository>,
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.require_post(*post_id).await?;

    if likes.check_user_liked(user_id.0, *post_id).await? {
        return Err(AppError::Conflict("post already liked".to_string()));
    }

    let like = likes.insert_like(user_id.0, *post_id).await?;
    Ok(HttpResponse::Created().json(like))
}

/// Remove a like. Removing a like that does not exist is a 404.
pub async fn unlike_post(
    likes: web::Data<LikeRepository>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let removed = likes.delete_like(user_id.0, *post_id).await?;
    if !removed {
        return Err(AppError::NotFound("like not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Bookmark a post. Bookmarking twice is a conflict.
pub async fn bookmark_post(
    bookmarks: web::Data<BookmarkRepository>,
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.require_post(*post_id).await?;

    if bookmarks.check_user_bookmarked(user_id.0, *post_id).await? {
        return Err(AppError::Conflict("post already bookmarked".to_string()));
    }

    let bookmark = bookmarks.insert_bookmark(user_id.0, *post_id).await?;
    Ok(HttpResponse::Created().json(bookmark))
}

/// Remove a bookmark. Removing a bookmark that does not exist is a 404.
pub async fn unbookmark_post(
    bookmarks: web::Data<BookmarkRepository>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let removed = bookmarks.delete_bookmark(user_id.0, *post_id).await?;
    if !removed {
        return Err(AppError::NotFound("bookmark not found".to_string()));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Comments on a post, newest first
pub async fn get_comments(
    comments: web::Data<CommentRepository>,
    service: web::Data<PostService>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.require_post(*post_id).await?;

    let rows = comments.list_for_post(*post_id).await?;

    let views: Vec<CommentView> = rows
        .into_iter()
        .map(|row| CommentView {
            id: row.id,
            body: row.body,
            created_at: row.created_at,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                username: row.user_username,
                avatar_url: row.user_avatar_url,
            },
        })
        .collect();

    Ok(HttpResponse::Ok().json(views))
}

/// Add a comment to a post
pub async fn submit_comment(
    comments: web::Data<CommentRepository>,
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    if req.body.trim().is_empty() {
        return Err(AppError::Validation("comment must not be empty".to_string()));
    }

    service.require_post(*post_id).await?;

    let comment = comments
        .insert_comment(*post_id, user_id.0, req.body.trim())
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// The caller's reading list (recent bookmarks)
pub async fn reading_list(
    service: web::Data<PostService>,
    config: web::Data<Config>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let entries = service
        .reading_list(user_id.0, config.suggestions.reading_list_limit)
        .await?;
    Ok(HttpResponse::Ok().json(entries))
}
