pub mod health;
pub mod hello;
pub mod post;

use actix_web::web;

use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;

/// Registers every route against the store type `R`. The
/// `PostService<R>` itself is expected as app data.
pub fn configure<R: PostRepository + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .route("/posts", web::get().to(post::get_posts::<R>))
        .route(
            "/posts/{year}/{month}/{day}",
            web::get().to(post::get_posts_by_date::<R>),
        )
        .route("/new", web::post().to(post::create_post::<R>))
        .route("/edit", web::put().to(post::update_post::<R>))
        .route("/delete", web::delete().to(post::delete_post::<R>))
        .route("/hello/{name}", web::get().to(hello::say_hello))
        .route("/ping", web::get().to(health::ping::<R>));
}

// Unreadable bodies and path segments are reported like any other invalid
// document.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| DomainError::Validation(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| DomainError::Validation(err.to_string()).into())
}
