use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use actix_web::{HttpResponse, http::header::ContentType, web};

/// Round-trips to the store.
pub async fn ping<R: PostRepository + 'static>(
    service: web::Data<PostService<R>>,
) -> Result<HttpResponse, DomainError> {
    service.ping().await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("Pong"))
}
