//! Feed module
//!
//! Post records in, RSS 2.0 or Atom 1.0 out.

pub mod renderer;
pub mod timestamp;
pub mod xml;

pub use renderer::{FeedDocument, FeedRenderer};
