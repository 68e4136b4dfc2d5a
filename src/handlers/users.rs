/// User handlers - profiles, authored posts, and suggestions
use crate::error::{AppError, Result};
use crate::middleware::{MaybeUserId, UserId};
use crate::repository::UserRepository;
use crate::services::{PgEngagementReader, PostService, SuggestionEngine};
use actix_web::{web, HttpResponse};

/// Public profile header for a user page
pub async fn get_profile(
    users: web::Data<UserRepository>,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let profile = users
        .profile(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{username}' not found")))?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Posts authored by a user, newest first
pub async fn get_user_posts(
    users: web::Data<UserRepository>,
    service: web::Data<PostService>,
    username: web::Path<String>,
    viewer: MaybeUserId,
) -> Result<HttpResponse> {
    let user = users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{username}' not found")))?;

    let posts = service.posts_by_author(user.id, viewer.0).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Users the caller might want to follow, based on shared tag interest
pub async fn get_suggestions(
    engine: web::Data<SuggestionEngine<PgEngagementReader>>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let suggestions = engine.suggest_for(user_id.0).await?;
    Ok(HttpResponse::Ok().json(suggestions))
}
