use crate::presentation::dto::HelloResponse;
use actix_web::{HttpResponse, web};

pub async fn say_hello(path: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(HelloResponse {
        message: format!("Hello {}", path.into_inner()),
    })
}
