//! Feed handlers
//!
//! `GET /user/:handle/{rss,atom}` and `GET /list/:list_id/{rss,atom}`.
//! Query parameters: `count`, `title`, `description`.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::app::{FeedRequest, DEFAULT_LIMIT};
use crate::domain::entities::FeedTarget;
use crate::error::AppError;
use crate::feed::FeedDocument;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub count: Option<u32>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl FeedQuery {
    fn into_request(self, target: FeedTarget) -> Result<FeedRequest, AppError> {
        let count = self.count.unwrap_or(DEFAULT_LIMIT);
        if count == 0 {
            return Err(AppError::BadRequest("count must be at least 1".to_string()));
        }

        Ok(FeedRequest {
            target,
            count,
            title: self.title.filter(|t| !t.is_empty()),
            description: self.description.filter(|d| !d.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedFormat {
    Rss,
    Atom,
}

impl FeedFormat {
    fn content_type(self) -> &'static str {
        match self {
            FeedFormat::Rss => "application/rss+xml; charset=utf-8",
            FeedFormat::Atom => "application/atom+xml; charset=utf-8",
        }
    }

    fn serialize(self, document: &FeedDocument) -> Result<String, AppError> {
        let body = match self {
            FeedFormat::Rss => document.to_rss()?,
            FeedFormat::Atom => document.to_atom()?,
        };
        Ok(body)
    }
}

async fn feed_response(
    state: &AppState,
    target: FeedTarget,
    query: Result<Query<FeedQuery>, QueryRejection>,
    format: FeedFormat,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let request = query.into_request(target)?;

    let document = match state.feed_service.build_feed(&request).await {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(feed = %request.target, error = %e, "Feed request failed");
            return Err(e);
        }
    };
    let body = format.serialize(&document)?;

    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

/// GET /user/:handle/rss
pub async fn user_rss(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    feed_response(&state, FeedTarget::User(handle), query, FeedFormat::Rss).await
}

/// GET /list/:list_id/rss
pub async fn list_rss(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    feed_response(&state, FeedTarget::List(list_id), query, FeedFormat::Rss).await
}

/// GET /user/:handle/atom
pub async fn user_atom(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    feed_response(&state, FeedTarget::User(handle), query, FeedFormat::Atom).await
}

/// GET /list/:list_id/atom
pub async fn list_atom(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    feed_response(&state, FeedTarget::List(list_id), query, FeedFormat::Atom).await
}
