//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and the renderer.

pub mod feed_service;
pub mod post_fetcher;
pub mod session_manager;

pub use feed_service::{FeedRequest, FeedService};
pub use post_fetcher::DEFAULT_LIMIT;
pub use session_manager::SessionManager;
