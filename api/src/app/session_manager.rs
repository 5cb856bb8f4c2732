//! Session manager
//!
//! Owns the one platform session of the process. A request asks for a
//! session and gets, in order of preference:
//! 1. the session already in memory, if it is still authenticated
//! 2. a fresh client restored from the persisted cookies
//! 3. a fresh client logged in with environment credentials
//!
//! The whole decision runs under a lock, so concurrent first requests
//! produce one login rather than several.
//!
//! Cookies of a session the platform rejected are remembered, and a stored
//! blob equal to them is skipped, so a stale cookie file leads to a fresh
//! credential login instead of being restored over and over.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::entities::CookieBlob;
use crate::domain::ports::{ClientFactory, CookieStore, CredentialSource, PlatformClient};
use crate::error::AuthError;

/// How a session obtained its authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    Cookies,
    Credentials,
}

/// Authenticated handle to the platform, cheap to clone
#[derive(Clone)]
pub struct Session {
    client: Arc<dyn PlatformClient>,
    origin: SessionOrigin,
    authenticated: Arc<AtomicBool>,
}

impl Session {
    fn new(client: Arc<dyn PlatformClient>, origin: SessionOrigin) -> Self {
        Self {
            client,
            origin,
            authenticated: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn client(&self) -> &dyn PlatformClient {
        self.client.as_ref()
    }

    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    /// Flag the session as rejected by the platform. Every clone sees the
    /// change, and the manager replaces the session on the next acquire.
    pub fn invalidate(&self) {
        self.authenticated.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("origin", &self.origin)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[derive(Default)]
struct SessionState {
    current: Option<Session>,
    /// Cookies of the last session the platform rejected
    rejected: Option<CookieBlob>,
}

/// Sole owner and mutator of the process-wide session
pub struct SessionManager {
    factory: Arc<dyn ClientFactory>,
    store: Arc<dyn CookieStore>,
    credentials: Arc<dyn CredentialSource>,
    state: Mutex<SessionState>,
}

impl SessionManager {
    pub fn new(
        factory: Arc<dyn ClientFactory>,
        store: Arc<dyn CookieStore>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        Self {
            factory,
            store,
            credentials,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Return an authenticated session, creating one if needed
    pub async fn acquire_session(&self) -> Result<Session, AuthError> {
        let mut state = self.state.lock().await;

        if let Some(session) = state.current.as_ref().filter(|s| s.is_authenticated()) {
            return Ok(session.clone());
        }

        if let Some(stale) = state.current.take() {
            tracing::info!(origin = ?stale.origin(), "Discarding rejected platform session");
            state.rejected = Some(stale.client().export_cookies());
        }

        let bundle = self.credentials.credentials();

        let restored = self
            .restore_from_store(bundle.proxy.as_deref(), state.rejected.as_ref())
            .await;
        let session = match restored {
            Some(session) => session,
            None => {
                let Some(login) = bundle.login_credentials() else {
                    tracing::error!("No saved cookies and no complete credentials in environment");
                    return Err(AuthError::NoCredentials);
                };

                tracing::info!(
                    username = %login.username,
                    "Attempting login with environment credentials"
                );
                let client = self
                    .factory
                    .create(bundle.proxy.as_deref())
                    .map_err(AuthError::Client)?;
                client.login(&login).await.map_err(|e| {
                    tracing::error!(error = %e, "Login failed");
                    AuthError::LoginFailed(e)
                })?;
                tracing::info!("Login successful");

                if let Err(e) = self.store.save(&client.export_cookies()).await {
                    tracing::warn!(error = %e, "Failed to persist session cookies");
                }
                state.rejected = None;
                Session::new(client, SessionOrigin::Credentials)
            }
        };

        state.current = Some(session.clone());
        Ok(session)
    }

    /// Drop the in-memory session; the next acquire starts from the store
    pub async fn reset(&self) {
        self.state.lock().await.current.take();
    }

    async fn restore_from_store(
        &self,
        proxy: Option<&str>,
        rejected: Option<&CookieBlob>,
    ) -> Option<Session> {
        let cookies = match self.store.load().await {
            Ok(Some(cookies)) if !cookies.is_empty() => cookies,
            Ok(_) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read saved cookies");
                return None;
            }
        };

        if rejected == Some(&cookies) {
            tracing::warn!("Saved cookies were rejected by the platform, skipping them");
            return None;
        }

        tracing::info!("Loading existing cookies");
        let client = match self.factory.create(proxy) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "Could not create client for cookie login");
                return None;
            }
        };

        match client.restore_cookies(&cookies) {
            Ok(()) => {
                tracing::info!("Cookie login successful");
                Some(Session::new(client, SessionOrigin::Cookies))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cookie login failed");
                None
            }
        }
    }
}
