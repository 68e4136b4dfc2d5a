pub mod posts;
pub mod tags;
pub mod users;

use actix_web::web;

/// Register the HTTP surface under /api/v1.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(
                web::resource("/posts")
                    .route(web::get().to(posts::list_posts))
                    .route(web::post().to(posts::create_post)),
            )
            .service(web::resource("/posts/{slug}").route(web::get().to(posts::get_post)))
            .service(
                web::resource("/posts/{id}/featured-image")
                    .route(web::put().to(posts::update_featured_image)),
            )
            .service(
                web::resource("/posts/{id}/like")
                    .route(web::post().to(posts::like_post))
                    .route(web::delete().to(posts::unlike_post)),
            )
            .service(
                web::resource("/posts/{id}/bookmark")
                    .route(web::post().to(posts::bookmark_post))
                    .route(web::delete().to(posts::unbookmark_post)),
            )
            .service(
                web::resource("/posts/{id}/comments")
                    .route(web::get().to(posts::get_comments))
                    .route(web::post().to(posts::submit_comment)),
            )
            .service(web::resource("/reading-list").route(web::get().to(posts::reading_list)))
            .service(
                web::resource("/tags")
                    .route(web::get().to(tags::list_tags))
                    .route(web::post().to(tags::create_tag)),
            )
            .service(
                web::resource("/users/{username}").route(web::get().to(users::get_profile)),
            )
            .service(
                web::resource("/users/{username}/posts")
                    .route(web::get().to(users::get_user_posts)),
            )
            .service(
                web::resource("/suggestions").route(web::get().to(users::get_suggestions)),
            ),
    );
}
