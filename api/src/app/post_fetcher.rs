//! Post fetcher
//!
//! One bounded timeline read per call. Platform tweets are adapted into
//! `PostRecord`s here; upstream failures are logged and collapse to an
//! empty result, so callers only ever see "some posts" or "no posts".

use crate::app::session_manager::Session;
use crate::domain::entities::{Engagement, MediaAttachment, PostRecord};
use crate::domain::ports::PlatformTweet;
use crate::error::{FetchError, PlatformError};

/// Posts per feed when the request does not say
pub const DEFAULT_LIMIT: u32 = 20;

/// Largest single fetch the platform serves
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Default, Clone, Copy)]
pub struct PostFetcher;

impl PostFetcher {
    pub fn new() -> Self {
        Self
    }

    /// Latest posts of account `handle`, newest first
    pub async fn fetch_user_timeline(
        &self,
        session: &Session,
        handle: &str,
        limit: u32,
    ) -> Result<Vec<PostRecord>, FetchError> {
        ensure_authenticated(session)?;
        let limit = clamp_limit(limit);

        tracing::info!(handle, limit, "Fetching user timeline");
        let result = session.client().user_tweets(handle, limit).await;
        Ok(collapse(session, result, || format!("user {}", handle)))
    }

    /// Latest posts of list `list_id`, newest first
    pub async fn fetch_list_timeline(
        &self,
        session: &Session,
        list_id: &str,
        limit: u32,
    ) -> Result<Vec<PostRecord>, FetchError> {
        ensure_authenticated(session)?;
        let limit = clamp_limit(limit);

        tracing::info!(list_id, limit, "Fetching list timeline");
        let result = session.client().list_tweets(list_id, limit).await;
        Ok(collapse(session, result, || format!("list {}", list_id)))
    }
}

fn ensure_authenticated(session: &Session) -> Result<(), FetchError> {
    if session.is_authenticated() {
        Ok(())
    } else {
        tracing::error!("Timeline fetch attempted without an authenticated session");
        Err(FetchError::NotAuthenticated)
    }
}

fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_LIMIT)
}

/// Adapt a successful fetch, or log the failure and return nothing
fn collapse(
    session: &Session,
    result: Result<Vec<PlatformTweet>, PlatformError>,
    target: impl FnOnce() -> String,
) -> Vec<PostRecord> {
    match result {
        Ok(tweets) => {
            let posts: Vec<PostRecord> = tweets.into_iter().filter_map(to_post_record).collect();
            tracing::info!(feed = %target(), count = posts.len(), "Retrieved posts");
            posts
        }
        Err(e) => {
            if matches!(e, PlatformError::Unauthorized) {
                session.invalidate();
            }
            tracing::error!(feed = %target(), error = %e, "Error fetching timeline");
            Vec::new()
        }
    }
}

/// Map one platform tweet to a post record. Tweets without an author
/// cannot be linked and are dropped; so is media missing a type or URL.
fn to_post_record(tweet: PlatformTweet) -> Option<PostRecord> {
    let Some(user) = tweet.user else {
        tracing::debug!(id = %tweet.id, "Skipping tweet without author");
        return None;
    };

    let media = tweet
        .media
        .into_iter()
        .filter_map(|m| {
            Some(MediaAttachment {
                media_type: m.media_type?,
                url: m.url?,
            })
        })
        .collect();

    Some(PostRecord {
        id: tweet.id,
        author_handle: user.screen_name,
        author_name: user.name,
        text: tweet.text.unwrap_or_default(),
        created_at: tweet.created_at,
        media,
        engagement: Engagement {
            likes: tweet.favorite_count,
            reposts: tweet.retweet_count,
            replies: tweet.reply_count,
        },
    })
}
