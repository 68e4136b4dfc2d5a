/// Tag handlers - listing and explicit tag creation
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::repository::TagRepository;
use crate::utils::slugify;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

/// All tags
pub async fn list_tags(tags: web::Data<TagRepository>, _user_id: UserId) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(tags.list().await?))
}

/// Create a tag. Tag names are unique; duplicates are a conflict.
pub async fn create_tag(
    tags: web::Data<TagRepository>,
    user_id: UserId,
    req: web::Json<CreateTagRequest>,
) -> Result<HttpResponse> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("tag name must not be empty".to_string()));
    }

    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::Validation(
            "tag name produces an empty slug".to_string(),
        ));
    }

    if tags.find_by_name(name).await?.is_some() {
        return Err(AppError::Conflict("tag already exists".to_string()));
    }

    let tag = tags.insert_tag(name, &slug).await?;
    tracing::info!(tag_id = %tag.id, created_by = %user_id.0, "tag created");

    Ok(HttpResponse::Created().json(tag))
}
