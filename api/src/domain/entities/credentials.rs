//! Authentication material
//!
//! Credentials come from the environment at session-creation time; the
//! cookie blob is what a successful login leaves behind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Everything the environment offers for opening a session
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialBundle {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub proxy: Option<String>,
}

impl CredentialBundle {
    /// The login triple, if all three parts are present and non-empty
    pub fn login_credentials(&self) -> Option<LoginCredentials> {
        let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(String::from);

        Some(LoginCredentials {
            username: present(&self.username)?,
            email: present(&self.email)?,
            password: present(&self.password)?,
        })
    }
}

impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("proxy", &self.proxy)
            .finish()
    }
}

/// A complete username/email/password triple
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Serialized session cookies, persisted as a JSON object of name to value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieBlob(pub BTreeMap<String, String>);

impl CookieBlob {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CookieBlob {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
