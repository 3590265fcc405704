use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::domain::post::{DateKey, PartialDate, PostId};

#[derive(Debug, Error)]
pub enum DomainError {
    /// A lookup by (partial) date returned nothing.
    #[error("post with date {0} not found")]
    PostsNotFound(PartialDate),
    /// The target of an update or delete does not exist.
    #[error("post with date {0} not found")]
    PostNotFound(DateKey),
    #[error("a post with date {0} already exists")]
    DuplicateDate(DateKey),
    #[error("a post with id {0} already exists")]
    DuplicateId(PostId),
    /// The store refused the document.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::PostsNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::PostNotFound(_)
            | DomainError::DuplicateDate(_)
            | DomainError::DuplicateId(_) => StatusCode::BAD_REQUEST,
            DomainError::InvalidDocument(_) | DomainError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            DomainError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        let details = match self {
            DomainError::PostsNotFound(date) => Some(json!(date)),
            DomainError::PostNotFound(key) | DomainError::DuplicateDate(key) => Some(json!(key)),
            DomainError::DuplicateId(id) => Some(json!({ "_id": id })),
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
