//! Blog post API keyed by creation date: at most one post per
//! (year, month, day), looked up by any subset of those segments.

pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod server;
