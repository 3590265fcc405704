//! Async HTTP client for the date-keyed blog API.

mod error;
mod http_client;
mod models;

pub use error::BlogClientError;
pub use http_client::BlogClientHttp;
pub use models::{NewPost, Post};
