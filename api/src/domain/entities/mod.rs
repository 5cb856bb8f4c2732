//! Domain entities
//!
//! Pure domain models: normalized posts, feed targets and metadata,
//! and the authentication material used to open a platform session.

pub mod credentials;
pub mod feed;
pub mod post;

pub use credentials::{CookieBlob, CredentialBundle, LoginCredentials};
pub use feed::{FeedMetadata, FeedTarget};
pub use post::{Engagement, MediaAttachment, PostRecord};
