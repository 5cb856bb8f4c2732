//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They record what was asked of them so tests can verify behavior.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::domain::entities::{CookieBlob, CredentialBundle, LoginCredentials};
use crate::domain::ports::{
    ClientFactory, CookieStore, CredentialSource, PlatformClient, PlatformTweet,
};
use crate::error::{PlatformError, StoreError};

use super::fixtures::session_cookies;

// ============================================================================
// Mock Platform Client
// ============================================================================

/// Canned upstream failure for timeline reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    RateLimited,
    NotFound,
    ServerError,
    Unauthorized,
}

impl MockFailure {
    fn to_error(self, target: &str) -> PlatformError {
        match self {
            MockFailure::RateLimited => PlatformError::RateLimited,
            MockFailure::NotFound => PlatformError::NotFound(target.to_string()),
            MockFailure::ServerError => PlatformError::Api {
                status: 502,
                message: "bad gateway".to_string(),
            },
            MockFailure::Unauthorized => PlatformError::Unauthorized,
        }
    }
}

/// Counters across every client a factory handed out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientCalls {
    pub creates: usize,
    pub logins: usize,
    pub restores: usize,
    pub timeline_reads: usize,
}

#[derive(Default)]
struct MockState {
    tweets: RwLock<Vec<PlatformTweet>>,
    timeline_failure: RwLock<Option<MockFailure>>,
    fail_login: AtomicBool,
    login_delay: RwLock<Option<Duration>>,
    calls: RwLock<ClientCalls>,
    restored: RwLock<Option<CookieBlob>>,
    last_request: RwLock<Option<(String, String, u32)>>,
}

/// Hands out `MockPlatformClient`s that share one configurable state
#[derive(Default)]
pub struct MockClientFactory {
    state: Arc<MockState>,
}

impl MockClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timelines return these tweets, truncated to the requested count
    pub fn with_tweets(self, tweets: Vec<PlatformTweet>) -> Self {
        *self.state.tweets.write().unwrap() = tweets;
        self
    }

    /// Timelines fail with `failure`
    pub fn with_timeline_failure(self, failure: MockFailure) -> Self {
        *self.state.timeline_failure.write().unwrap() = Some(failure);
        self
    }

    /// Every login is rejected by the platform
    pub fn failing_login(self) -> Self {
        self.state.fail_login.store(true, Ordering::SeqCst);
        self
    }

    /// Logins take this long to complete
    pub fn with_login_delay_ms(self, ms: u64) -> Self {
        *self.state.login_delay.write().unwrap() = Some(Duration::from_millis(ms));
        self
    }

    pub fn calls(&self) -> ClientCalls {
        *self.state.calls.read().unwrap()
    }

    /// Cookies most recently passed to `restore_cookies`
    pub fn restored(&self) -> Option<CookieBlob> {
        self.state.restored.read().unwrap().clone()
    }

    /// Last timeline read as (kind, target, count)
    pub fn last_request(&self) -> Option<(String, String, u32)> {
        self.state.last_request.read().unwrap().clone()
    }
}

impl ClientFactory for MockClientFactory {
    fn create(&self, _proxy: Option<&str>) -> Result<Arc<dyn PlatformClient>, PlatformError> {
        self.state.calls.write().unwrap().creates += 1;
        Ok(Arc::new(MockPlatformClient {
            state: self.state.clone(),
            cookies: RwLock::new(CookieBlob::default()),
        }))
    }
}

pub struct MockPlatformClient {
    state: Arc<MockState>,
    cookies: RwLock<CookieBlob>,
}

impl MockPlatformClient {
    fn timeline(
        &self,
        kind: &str,
        target: &str,
        count: u32,
    ) -> Result<Vec<PlatformTweet>, PlatformError> {
        self.state.calls.write().unwrap().timeline_reads += 1;
        *self.state.last_request.write().unwrap() =
            Some((kind.to_string(), target.to_string(), count));

        if let Some(failure) = *self.state.timeline_failure.read().unwrap() {
            return Err(failure.to_error(target));
        }

        let tweets = self.state.tweets.read().unwrap();
        Ok(tweets.iter().take(count as usize).cloned().collect())
    }
}

#[async_trait]
impl PlatformClient for MockPlatformClient {
    async fn login(&self, _credentials: &LoginCredentials) -> Result<(), PlatformError> {
        self.state.calls.write().unwrap().logins += 1;

        let delay = *self.state.login_delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.state.fail_login.load(Ordering::SeqCst) {
            return Err(PlatformError::LoginRejected("denied by mock".to_string()));
        }

        *self.cookies.write().unwrap() = session_cookies();
        Ok(())
    }

    fn restore_cookies(&self, cookies: &CookieBlob) -> Result<(), PlatformError> {
        self.state.calls.write().unwrap().restores += 1;
        *self.state.restored.write().unwrap() = Some(cookies.clone());

        if cookies.get("auth_token").is_none() {
            return Err(PlatformError::InvalidCookies(
                "missing auth_token".to_string(),
            ));
        }

        *self.cookies.write().unwrap() = cookies.clone();
        Ok(())
    }

    fn export_cookies(&self) -> CookieBlob {
        self.cookies.read().unwrap().clone()
    }

    async fn user_tweets(
        &self,
        screen_name: &str,
        count: u32,
    ) -> Result<Vec<PlatformTweet>, PlatformError> {
        self.timeline("user", screen_name, count)
    }

    async fn list_tweets(
        &self,
        list_id: &str,
        count: u32,
    ) -> Result<Vec<PlatformTweet>, PlatformError> {
        self.timeline("list", list_id, count)
    }
}

// ============================================================================
// In-Memory Cookie Store
// ============================================================================

#[derive(Default)]
pub struct InMemoryCookieStore {
    cookies: RwLock<Option<CookieBlob>>,
    corrupt: AtomicBool,
    fail_saves: AtomicBool,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl InMemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with saved cookies
    pub fn with_cookies(cookies: CookieBlob) -> Self {
        let store = Self::default();
        *store.cookies.write().unwrap() = Some(cookies);
        store
    }

    /// Loads fail as if the file were unreadable, until the next save
    pub fn corrupt() -> Self {
        let store = Self::default();
        store.corrupt.store(true, Ordering::SeqCst);
        store
    }

    /// Saves fail with an I/O error
    pub fn failing_saves(self) -> Self {
        self.fail_saves.store(true, Ordering::SeqCst);
        self
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Save attempts, failed ones included
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Option<CookieBlob> {
        self.cookies.read().unwrap().clone()
    }
}

#[async_trait]
impl CookieStore for InMemoryCookieStore {
    async fn load(&self) -> Result<Option<CookieBlob>, StoreError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(StoreError::Corrupt("expected value at line 1".to_string()));
        }
        Ok(self.cookies.read().unwrap().clone())
    }

    async fn save(&self, cookies: &CookieBlob) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only store",
            )));
        }
        self.corrupt.store(false, Ordering::SeqCst);
        *self.cookies.write().unwrap() = Some(cookies.clone());
        Ok(())
    }
}

// ============================================================================
// Static Credential Source
// ============================================================================

pub struct StaticCredentialSource {
    bundle: CredentialBundle,
}

impl StaticCredentialSource {
    pub fn new(bundle: CredentialBundle) -> Self {
        Self { bundle }
    }

    /// Nothing configured at all
    pub fn empty() -> Self {
        Self::new(CredentialBundle::default())
    }
}

impl CredentialSource for StaticCredentialSource {
    fn credentials(&self) -> CredentialBundle {
        self.bundle.clone()
    }
}
