//! birdfeed API Server
//!
//! Serves account and list timelines of the social platform as RSS 2.0 and
//! Atom 1.0 feeds. Uses hexagonal (ports & adapters) architecture for clean
//! separation of concerns.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{error_handling::HandleErrorLayer, routing::get, BoxError, Router};
use tower::timeout::{error::Elapsed, TimeoutLayer};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod error;
mod feed;
mod handlers;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod integration_tests;

use adapters::{EnvCredentialSource, FileCookieStore, TwitterClientFactory};
use app::{FeedService, SessionManager};
use config::Config;
use error::AppError;
use feed::FeedRenderer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub feed_service: Arc<FeedService>,
}

/// Routes and middleware. `/health` sits outside tracing and the timeout.
pub fn app_router(state: AppState, request_timeout: Duration) -> Router {
    let feeds = Router::new()
        .route("/", get(handlers::service_info))
        .route("/user/:handle/rss", get(handlers::user_rss))
        .route("/user/:handle/atom", get(handlers::user_atom))
        .route("/list/:list_id/rss", get(handlers::list_rss))
        .route("/list/:list_id/atom", get(handlers::list_atom))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    middleware_error(err, request_timeout)
                }))
                .layer(TimeoutLayer::new(request_timeout)),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .merge(feeds)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Errors raised by the middleware stack, as JSON error responses
fn middleware_error(err: BoxError, timeout: Duration) -> AppError {
    if err.is::<Elapsed>() {
        AppError::Timeout(timeout)
    } else {
        AppError::Internal(err.to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,birdfeed_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting birdfeed...");

    // Load configuration
    let config = Config::from_env();
    tracing::info!(
        cookies = %config.cookies_path.display(),
        api = %config.twitter_api_url,
        "Configuration loaded"
    );

    // Create adapters
    let factory = Arc::new(TwitterClientFactory::new(
        config.twitter_api_url.clone(),
        config.request_timeout,
    ));
    let store = Arc::new(FileCookieStore::new(config.cookies_path.clone()));
    let credentials = Arc::new(EnvCredentialSource);

    // Create application services
    let sessions = Arc::new(SessionManager::new(factory, store, credentials));
    let feed_service = Arc::new(FeedService::new(
        sessions,
        FeedRenderer::new(&config.twitter_base_url),
    ));

    let app = app_router(AppState { feed_service }, config.request_timeout);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
