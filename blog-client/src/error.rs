use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogClientError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// The server refused the write (date taken, or nothing to update/delete).
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl BlogClientError {
    pub(crate) async fn from_http_response(resp: Response) -> Self {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.error,
            Err(_) if text.is_empty() => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
            Err(_) => text,
        };

        match status {
            StatusCode::NOT_FOUND => BlogClientError::NotFound(message),
            StatusCode::BAD_REQUEST => BlogClientError::Rejected(message),
            StatusCode::UNPROCESSABLE_ENTITY => BlogClientError::InvalidRequest(message),
            _ => BlogClientError::Status {
                status: status.as_u16(),
                message,
            },
        }
    }
}
