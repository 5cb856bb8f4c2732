//! Feed service
//!
//! One feed request end to end: acquire a session, fetch the timeline,
//! refuse empty results, render the document.

use std::sync::Arc;

use crate::app::post_fetcher::{PostFetcher, DEFAULT_LIMIT};
use crate::app::session_manager::SessionManager;
use crate::domain::entities::{FeedMetadata, FeedTarget};
use crate::error::AppError;
use crate::feed::{FeedDocument, FeedRenderer};

/// What a client asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub target: FeedTarget,
    pub count: u32,
    /// Overrides the default channel title
    pub title: Option<String>,
    /// Overrides the default channel description
    pub description: Option<String>,
}

impl FeedRequest {
    pub fn new(target: FeedTarget) -> Self {
        Self {
            target,
            count: DEFAULT_LIMIT,
            title: None,
            description: None,
        }
    }
}

pub struct FeedService {
    sessions: Arc<SessionManager>,
    fetcher: PostFetcher,
    renderer: FeedRenderer,
}

impl FeedService {
    pub fn new(sessions: Arc<SessionManager>, renderer: FeedRenderer) -> Self {
        Self {
            sessions,
            fetcher: PostFetcher::new(),
            renderer,
        }
    }

    pub async fn build_feed(&self, request: &FeedRequest) -> Result<FeedDocument, AppError> {
        let target = &request.target;
        tracing::info!(feed = %target, count = request.count, "Generating feed");

        let session = self.sessions.acquire_session().await?;

        let posts = match target {
            FeedTarget::User(handle) => {
                self.fetcher
                    .fetch_user_timeline(&session, handle, request.count)
                    .await?
            }
            FeedTarget::List(list_id) => {
                self.fetcher
                    .fetch_list_timeline(&session, list_id, request.count)
                    .await?
            }
        };

        if posts.is_empty() {
            return Err(AppError::NotFound(format!(
                "No tweets found for {}",
                target.describe()
            )));
        }

        let metadata = FeedMetadata::for_target(
            target,
            self.renderer.base_url(),
            request.title.clone(),
            request.description.clone(),
        );
        let document = self.renderer.render(&metadata, &posts);

        tracing::info!(feed = %target, entries = document.entries.len(), "Feed generated");
        Ok(document)
    }
}
