use crate::application::post_service::PostService;
use crate::data::post_repository::PostRepository;
use crate::infrastructure::config::AppConfig;
use crate::presentation::handlers;
use crate::presentation::middleware::{assign_request_id, time_request};
use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger, NormalizePath, from_fn};
use actix_web::{App, HttpServer, web};
use tracing::info;

/// Serves the HTTP API until the process receives SIGINT/SIGTERM.
pub async fn start_rest_server<R>(config: &AppConfig, service: PostService<R>) -> std::io::Result<()>
where
    R: PostRepository + 'static,
{
    let service = web::Data::new(service);
    let cors_origins = config.cors_origins.clone();
    let bind_address = (config.host.as_str(), config.port);

    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(from_fn(time_request))
            .wrap(from_fn(assign_request_id))
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(build_cors(&cors_origins))
            .wrap(NormalizePath::trim())
            .app_data(service.clone())
            .configure(handlers::configure::<R>)
    })
    .bind(bind_address)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec!["x-request-id", "server-timing"])
        .max_age(3600);

    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
