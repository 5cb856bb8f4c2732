//! Session persistence ports
//!
//! Where cookies are kept between restarts, and where login credentials
//! are read from when a fresh login is needed.

use async_trait::async_trait;

use crate::domain::entities::{CookieBlob, CredentialBundle};
use crate::error::StoreError;

/// Persists the cookie blob of the current session
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// Load the stored blob; `Ok(None)` when nothing has been stored yet
    async fn load(&self) -> Result<Option<CookieBlob>, StoreError>;

    /// Replace the stored blob
    async fn save(&self, cookies: &CookieBlob) -> Result<(), StoreError>;
}

/// Supplies credentials at session-creation time
pub trait CredentialSource: Send + Sync {
    fn credentials(&self) -> CredentialBundle;
}
