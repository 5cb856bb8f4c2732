//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod feeds;
pub mod meta;

pub use feeds::{list_atom, list_rss, user_atom, user_rss};
pub use meta::{health, service_info};
