pub mod error;
pub mod memory_repository;
pub mod post_repository;
