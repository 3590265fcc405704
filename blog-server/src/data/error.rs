use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::post::{DateKey, PostId};

/// Outcome of a failed store call, independent of the backing database.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("date {0} is already taken")]
    DuplicateDate(DateKey),
    #[error("id {0} is already taken")]
    DuplicateId(PostId),
    #[error("document rejected: {0}")]
    InvalidDocument(String),
    #[error("store operation timed out")]
    Timeout,
    #[error("store error: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateDate(key) => DomainError::DuplicateDate(key),
            StoreError::DuplicateId(id) => DomainError::DuplicateId(id),
            StoreError::InvalidDocument(reason) => DomainError::InvalidDocument(reason),
            err @ (StoreError::Timeout | StoreError::Backend(_)) => {
                DomainError::Internal(err.to_string())
            }
        }
    }
}
