use std::time::Instant;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Next;
use actix_web::{Error, HttpMessage};
use tracing::{info, warn};
use uuid::Uuid;

static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
static TIMING_HEADER: HeaderName = HeaderName::from_static("server-timing");

// longer or non-visible-ASCII ids from clients are replaced
const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Clone)]
pub struct RequestId(pub String);

/// Request id of `req`, or `"unknown"` outside [`assign_request_id`].
pub fn request_id(req: &impl HttpMessage) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

fn incoming_request_id(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty() && s.len() <= MAX_REQUEST_ID_LEN)
        .filter(|s| s.bytes().all(|b| b.is_ascii_graphic()))
        .map(str::to_owned)
}

/// Tags every request with an id (client supplied or fresh) and echoes it
/// back in `x-request-id`. Mount with `middleware::from_fn`.
pub async fn assign_request_id(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let id = incoming_request_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.call(req).await?;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    }
    Ok(res)
}

/// Logs one `request completed` line per request and adds `server-timing`.
pub async fn time_request(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.path().to_owned();
    let rid = request_id(&req);

    let mut res = next.call(req).await?;
    let duration_ms = start.elapsed().as_millis();
    let status = res.status().as_u16();

    if res.status().is_server_error() {
        warn!(request_id = %rid, %method, %path, status, duration_ms, "request completed");
    } else {
        info!(request_id = %rid, %method, %path, status, duration_ms, "request completed");
    }

    if let Ok(value) = HeaderValue::from_str(&format!("app;dur={duration_ms}")) {
        res.headers_mut().insert(TIMING_HEADER.clone(), value);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::middleware::from_fn;
    use actix_web::{App, HttpRequest, HttpResponse, test, web};

    async fn echo_id(req: HttpRequest) -> HttpResponse {
        HttpResponse::Ok().body(request_id(&req))
    }

    #[actix_web::test]
    async fn client_request_id_is_echoed() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(assign_request_id))
                .route("/", web::get().to(echo_id)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("x-request-id", "abc-123"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
        assert_eq!(test::read_body(resp).await, "abc-123");
    }

    #[actix_web::test]
    async fn unusable_request_id_is_replaced() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(assign_request_id))
                .route("/", web::get().to(echo_id)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("x-request-id", "a".repeat(MAX_REQUEST_ID_LEN + 1)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        let id = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[actix_web::test]
    async fn timing_header_is_added() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(time_request))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        let timing = resp.headers().get("server-timing").unwrap().to_str().unwrap();
        assert!(timing.starts_with("app;dur="));
    }

    #[actix_web::test]
    async fn timing_sees_the_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(time_request))
                .wrap(from_fn(assign_request_id))
                .route("/", web::get().to(echo_id)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("x-request-id", "rid-7"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.headers().contains_key("server-timing"));
        assert_eq!(resp.headers().get("x-request-id").unwrap(), "rid-7");
    }
}
