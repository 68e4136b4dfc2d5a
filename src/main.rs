use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_service::config::Config;
use blog_service::handlers;
use blog_service::middleware::{JwtValidator, RequestLogMiddleware};
use blog_service::repository::{
    BookmarkRepository, CommentRepository, LikeRepository, TagRepository, UserRepository,
};
use blog_service::services::{
    PgEngagementReader, PostService, SuggestionEngine, SuggestionPolicy,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to create database pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let validator = Arc::new(JwtValidator::new(&config.auth.jwt_secret));

    let policy = SuggestionPolicy {
        scan_limit: config.suggestions.scan_limit,
        max_results: config.suggestions.max_results,
    };
    let engine = web::Data::new(SuggestionEngine::new(
        PgEngagementReader::new(pool.clone()),
        policy,
    ));

    let post_service = web::Data::new(PostService::new(pool.clone()));
    let likes = web::Data::new(LikeRepository::new(pool.clone()));
    let bookmarks = web::Data::new(BookmarkRepository::new(pool.clone()));
    let comments = web::Data::new(CommentRepository::new(pool.clone()));
    let tags = web::Data::new(TagRepository::new(pool.clone()));
    let users = web::Data::new(UserRepository::new(pool.clone()));
    let validator_data = web::Data::new(validator);
    let config_data = web::Data::new(config.clone());

    let bind_addr = (config.app.host.clone(), config.app.port);
    tracing::info!("Listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(post_service.clone())
            .app_data(likes.clone())
            .app_data(bookmarks.clone())
            .app_data(comments.clone())
            .app_data(tags.clone())
            .app_data(users.clone())
            .app_data(engine.clone())
            .app_data(validator_data.clone())
            .app_data(config_data.clone())
            .wrap(RequestLogMiddleware)
            .route("/health", web::get().to(|| async { "OK" }))
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
