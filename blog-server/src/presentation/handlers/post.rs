use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::post::PartialDate;
use crate::presentation::dto::{DateKeyPayload, PostPayload};
use crate::presentation::middleware::request_id;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;

/// `GET /posts/{year}/{month}/{day}`; a `0` segment matches any value.
pub async fn get_posts_by_date<R: PostRepository + 'static>(
    req: HttpRequest,
    service: web::Data<PostService<R>>,
    path: web::Path<(i32, i32, i32)>,
) -> Result<HttpResponse, DomainError> {
    let (year, month, day) = path.into_inner();
    let filter = PartialDate::from_segments(year, month, day);
    let posts = service.find_by_date(filter).await?;

    info!(
        request_id = %request_id(&req),
        filter = %filter,
        count = posts.len(),
        "posts retrieved"
    );

    Ok(HttpResponse::Ok().json(posts))
}

pub async fn get_posts<R: PostRepository + 'static>(
    req: HttpRequest,
    service: web::Data<PostService<R>>,
) -> Result<HttpResponse, DomainError> {
    let posts = service.find_all().await?;

    info!(
        request_id = %request_id(&req),
        count = posts.len(),
        "posts retrieved"
    );

    Ok(HttpResponse::Ok().json(posts))
}

pub async fn create_post<R: PostRepository + 'static>(
    req: HttpRequest,
    service: web::Data<PostService<R>>,
    payload: web::Json<PostPayload>,
) -> Result<HttpResponse, DomainError> {
    let post = service.create(payload.into_inner().into()).await?;

    info!(
        request_id = %request_id(&req),
        post_id = %post.id,
        date = %post.key(),
        "post created"
    );

    Ok(HttpResponse::Created().json(post))
}

pub async fn update_post<R: PostRepository + 'static>(
    req: HttpRequest,
    service: web::Data<PostService<R>>,
    payload: web::Json<PostPayload>,
) -> Result<HttpResponse, DomainError> {
    let post = service.update(payload.into_inner().into()).await?;

    info!(
        request_id = %request_id(&req),
        post_id = %post.id,
        date = %post.key(),
        "post updated"
    );

    Ok(HttpResponse::Accepted().json(post))
}

pub async fn delete_post<R: PostRepository + 'static>(
    req: HttpRequest,
    service: web::Data<PostService<R>>,
    payload: web::Json<DateKeyPayload>,
) -> Result<HttpResponse, DomainError> {
    let key = PartialDate::from(payload.into_inner()).resolve(service.today())?;
    service.delete(key).await?;

    info!(
        request_id = %request_id(&req),
        date = %key,
        "post deleted"
    );

    Ok(HttpResponse::Accepted().finish())
}
