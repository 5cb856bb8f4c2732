//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use crate::domain::entities::{CookieBlob, CredentialBundle, PostRecord};
use crate::domain::ports::{PlatformTweet, PlatformUser};

/// A complete credential bundle without proxy
pub fn test_credentials() -> CredentialBundle {
    CredentialBundle {
        username: Some("feedbot".to_string()),
        email: Some("feedbot@example.com".to_string()),
        password: Some("correct horse battery staple".to_string()),
        proxy: None,
    }
}

/// Cookies a successful login leaves behind
pub fn session_cookies() -> CookieBlob {
    [("auth_token", "tok"), ("ct0", "csrf")].into_iter().collect()
}

/// A platform tweet with author and timestamp set
pub fn platform_tweet(id: &str, handle: &str, text: &str) -> PlatformTweet {
    PlatformTweet {
        id: id.to_string(),
        text: Some(text.to_string()),
        created_at: Some("Mon Jan 01 00:00:00 +0000 2024".to_string()),
        user: Some(PlatformUser {
            screen_name: handle.to_string(),
            name: Some(format!("{} (display)", handle)),
        }),
        media: vec![],
        favorite_count: None,
        retweet_count: None,
        reply_count: None,
    }
}

/// A post dated 2024-01-01T00:00:00Z
pub fn test_post(id: &str, handle: &str, text: &str) -> PostRecord {
    let mut post = PostRecord::new(id, handle, text);
    post.created_at = Some("2024-01-01T00:00:00Z".to_string());
    post
}
