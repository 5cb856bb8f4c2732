//! Social platform client port trait
//!
//! Defines the interface for talking to the platform: opening a session and
//! reading timelines. The tweet types here mirror the platform's payloads,
//! with every field that can be missing upstream kept optional.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{CookieBlob, LoginCredentials};
use crate::error::PlatformError;

/// Author of a tweet as the platform reports it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformUser {
    pub screen_name: String,
    pub name: Option<String>,
}

/// Media entity attached to a tweet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformMedia {
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    pub url: Option<String>,
}

/// Tweet representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformTweet {
    pub id: String,
    pub text: Option<String>,
    pub created_at: Option<String>,
    pub user: Option<PlatformUser>,
    #[serde(default)]
    pub media: Vec<PlatformMedia>,
    pub favorite_count: Option<u64>,
    pub retweet_count: Option<u64>,
    pub reply_count: Option<u64>,
}

/// Port trait for platform API operations
#[async_trait]
pub trait PlatformClient: Send + Sync {
    // Session

    /// Run the platform login flow; on success the client holds session cookies
    async fn login(&self, credentials: &LoginCredentials) -> Result<(), PlatformError>;

    /// Load previously exported session cookies into the client
    fn restore_cookies(&self, cookies: &CookieBlob) -> Result<(), PlatformError>;

    /// Snapshot the client's current session cookies
    fn export_cookies(&self) -> CookieBlob;

    // Timelines

    /// Most recent tweets posted by `screen_name`, at most `count`
    async fn user_tweets(
        &self,
        screen_name: &str,
        count: u32,
    ) -> Result<Vec<PlatformTweet>, PlatformError>;

    /// Most recent tweets of list `list_id`, at most `count`
    async fn list_tweets(
        &self,
        list_id: &str,
        count: u32,
    ) -> Result<Vec<PlatformTweet>, PlatformError>;
}

/// Builds fresh, unauthenticated platform clients
pub trait ClientFactory: Send + Sync {
    fn create(&self, proxy: Option<&str>) -> Result<Arc<dyn PlatformClient>, PlatformError>;
}
