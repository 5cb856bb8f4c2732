//! HTTP contract tests for the birdfeed API
//!
//! The full router runs against mock ports through axum-test, so every
//! request exercises session acquisition, fetch, render and error mapping.
//!
//! Run with: cargo test integration_tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::app::{FeedService, SessionManager};
    use crate::feed::FeedRenderer;
    use crate::test_utils::{
        platform_tweet, session_cookies, test_credentials, InMemoryCookieStore, MockClientFactory,
        StaticCredentialSource,
    };
    use crate::{app_router, AppState};

    fn server_with(
        factory: Arc<MockClientFactory>,
        credentials: StaticCredentialSource,
    ) -> TestServer {
        server_with_timeout(factory, credentials, Duration::from_secs(5))
    }

    fn server_with_timeout(
        factory: Arc<MockClientFactory>,
        credentials: StaticCredentialSource,
        request_timeout: Duration,
    ) -> TestServer {
        let sessions = SessionManager::new(
            factory,
            Arc::new(InMemoryCookieStore::new()),
            Arc::new(credentials),
        );
        let feed_service = FeedService::new(Arc::new(sessions), FeedRenderer::default());
        let state = AppState {
            feed_service: Arc::new(feed_service),
        };
        TestServer::new(app_router(state, request_timeout)).unwrap()
    }

    fn server(factory: MockClientFactory) -> TestServer {
        server_with(
            Arc::new(factory),
            StaticCredentialSource::new(test_credentials()),
        )
    }

    #[tokio::test]
    async fn health_reports_service() {
        let server = server(MockClientFactory::new());

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "birdfeed");
    }

    #[tokio::test]
    async fn root_lists_endpoints() {
        let server = server(MockClientFactory::new());

        let response = server.get("/").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["name"], "birdfeed");
        assert_eq!(body["endpoints"]["user_timeline"], "/user/{username}/rss");
        assert_eq!(body["endpoints"]["list_timeline"], "/list/{list_id}/rss");
    }

    #[tokio::test]
    async fn user_rss_returns_feed() {
        let server = server(
            MockClientFactory::new().with_tweets(vec![platform_tweet("1", "alice", "hello world")]),
        );

        let response = server.get("/user/alice/rss").await;

        response.assert_status_ok();
        assert_eq!(
            response.header("content-type"),
            "application/rss+xml; charset=utf-8"
        );
        let feed = feed_rs::parser::parse(response.text().as_bytes()).unwrap();
        assert_eq!(feed.entries.len(), 1);
        assert_eq!(feed.entries[0].id, "https://twitter.com/alice/status/1");
        assert_eq!(
            feed.title.map(|t| t.content).as_deref(),
            Some("Twitter Timeline: @alice")
        );
    }

    #[tokio::test]
    async fn list_atom_honors_query_overrides() {
        let factory = Arc::new(MockClientFactory::new().with_tweets(vec![
            platform_tweet("3", "bob", "c"),
            platform_tweet("2", "bob", "b"),
            platform_tweet("1", "bob", "a"),
        ]));
        let server = server_with(
            factory.clone(),
            StaticCredentialSource::new(test_credentials()),
        );

        let response = server
            .get("/list/987/atom")
            .add_query_param("count", 2)
            .add_query_param("title", "Friends")
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("content-type"),
            "application/atom+xml; charset=utf-8"
        );
        let feed = feed_rs::parser::parse(response.text().as_bytes()).unwrap();
        assert_eq!(feed.title.map(|t| t.content).as_deref(), Some("Friends"));
        let ids: Vec<_> = feed.entries.iter().map(|e| e.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                "https://twitter.com/bob/status/3",
                "https://twitter.com/bob/status/2",
            ]
        );
        assert_eq!(
            factory.last_request(),
            Some(("list".to_string(), "987".to_string(), 2))
        );
    }

    #[tokio::test]
    async fn zero_posts_is_404() {
        let server = server(MockClientFactory::new());

        let response = server.get("/user/ghost/rss").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["details"], "No tweets found for user: ghost");
    }

    #[tokio::test]
    async fn auth_failure_is_500_with_json_body() {
        let server = server_with(
            Arc::new(MockClientFactory::new()),
            StaticCredentialSource::empty(),
        );

        let response = server.get("/list/1/rss").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["error"], "Authentication failed");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn zero_count_is_400() {
        let server = server(MockClientFactory::new());

        let response = server
            .get("/user/alice/rss")
            .add_query_param("count", 0)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Bad request");
    }

    #[tokio::test]
    async fn non_numeric_count_is_400_with_json_body() {
        let server = server(MockClientFactory::new());

        let response = server
            .get("/user/alice/rss")
            .add_query_param("count", "abc")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Bad request");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn negative_count_is_400_with_json_body() {
        let factory = Arc::new(MockClientFactory::new());
        let server = server_with(
            factory.clone(),
            StaticCredentialSource::new(test_credentials()),
        );

        let response = server
            .get("/list/42/atom")
            .add_query_param("count", -5)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Bad request");
        assert!(body["details"].is_string());
        // Rejected before any session work
        assert_eq!(factory.calls().creates, 0);
    }

    #[tokio::test]
    async fn slow_request_times_out_with_json_body() {
        let factory = Arc::new(
            MockClientFactory::new()
                .with_tweets(vec![platform_tweet("1", "alice", "hi")])
                .with_login_delay_ms(500),
        );
        let server = server_with_timeout(
            factory,
            StaticCredentialSource::new(test_credentials()),
            Duration::from_millis(50),
        );

        let response = server.get("/user/alice/rss").await;

        response.assert_status(StatusCode::REQUEST_TIMEOUT);
        let body: Value = response.json();
        assert_eq!(body["error"], "Request timeout");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn session_survives_across_requests() {
        let factory = Arc::new(
            MockClientFactory::new().with_tweets(vec![platform_tweet("1", "alice", "hi")]),
        );
        let server = server_with(
            factory.clone(),
            StaticCredentialSource::new(test_credentials()),
        );

        server.get("/user/alice/rss").await.assert_status_ok();
        server.get("/user/alice/atom").await.assert_status_ok();

        assert_eq!(factory.calls().logins, 1);
        assert_eq!(factory.calls().timeline_reads, 2);
    }

    #[tokio::test]
    async fn saved_cookies_avoid_login() {
        let factory = Arc::new(
            MockClientFactory::new().with_tweets(vec![platform_tweet("1", "alice", "hi")]),
        );
        let sessions = SessionManager::new(
            factory.clone(),
            Arc::new(InMemoryCookieStore::with_cookies(session_cookies())),
            Arc::new(StaticCredentialSource::empty()),
        );
        let state = AppState {
            feed_service: Arc::new(FeedService::new(
                Arc::new(sessions),
                FeedRenderer::default(),
            )),
        };
        let server = TestServer::new(app_router(state, Duration::from_secs(5))).unwrap();

        server.get("/user/alice/rss").await.assert_status_ok();

        assert_eq!(factory.calls().logins, 0);
        assert_eq!(factory.calls().restores, 1);
    }
}
