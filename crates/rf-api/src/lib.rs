//! # rf-api
//!
//! The web routing layer for Rusty-Forum. Everything is mounted under `/api`.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::{web, HttpRequest};

use crate::error::ApiError;

/// Configures the JSON API routes and the extractor error handlers.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _: &HttpRequest| {
        ApiError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _: &HttpRequest| {
        ApiError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _: &HttpRequest| {
        ApiError::BadRequest(err.to_string()).into()
    }))
    .service(
        web::scope("/api")
            .route("/user/{nickname}/create", web::post().to(handlers::create_user))
            .route("/user/{nickname}/profile", web::get().to(handlers::get_profile))
            .route("/user/{nickname}/profile", web::post().to(handlers::update_profile))
            .route("/forum/create", web::post().to(handlers::create_forum))
            .route("/forum/{slug}/details", web::get().to(handlers::forum_details))
            .route("/forum/{slug}/create", web::post().to(handlers::create_thread))
            .route("/forum/{slug}/threads", web::get().to(handlers::forum_threads))
            .route("/forum/{slug}/users", web::get().to(handlers::forum_users))
            .route("/thread/{slug_or_id}/create", web::post().to(handlers::create_posts))
            .route("/thread/{slug_or_id}/vote", web::post().to(handlers::vote))
            .route("/thread/{slug_or_id}/details", web::get().to(handlers::thread_details))
            .route("/thread/{slug_or_id}/details", web::post().to(handlers::update_thread))
            .route("/thread/{slug_or_id}/posts", web::get().to(handlers::thread_posts))
            .route("/post/{id}/details", web::get().to(handlers::post_details))
            .route("/post/{id}/details", web::post().to(handlers::update_post))
            .route("/service/status", web::get().to(handlers::status))
            .route("/service/clear", web::post().to(handlers::clear)),
    );
}
