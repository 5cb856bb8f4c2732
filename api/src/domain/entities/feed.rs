//! Feed target and metadata
//!
//! A feed is requested for either an account or a list. Channel metadata
//! falls back to values derived from the target when the request omits them.

/// What a feed is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedTarget {
    /// An account timeline, by handle
    User(String),
    /// A list timeline, by list id
    List(String),
}

impl FeedTarget {
    pub fn default_title(&self) -> String {
        match self {
            FeedTarget::User(handle) => format!("Twitter Timeline: @{}", handle),
            FeedTarget::List(id) => format!("Twitter List: {}", id),
        }
    }

    pub fn default_description(&self) -> String {
        match self {
            FeedTarget::User(handle) => format!("Recent tweets from @{}", handle),
            FeedTarget::List(id) => format!("Recent tweets from Twitter list {}", id),
        }
    }

    /// Canonical web page for the target
    pub fn link(&self, base_url: &str) -> String {
        let base_url = base_url.trim_end_matches('/');
        match self {
            FeedTarget::User(handle) => format!("{}/{}", base_url, handle),
            FeedTarget::List(id) => format!("{}/i/lists/{}", base_url, id),
        }
    }

    /// Used in "no tweets found for ..." messages
    pub fn describe(&self) -> String {
        match self {
            FeedTarget::User(handle) => format!("user: {}", handle),
            FeedTarget::List(id) => format!("list: {}", id),
        }
    }
}

impl std::fmt::Display for FeedTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedTarget::User(handle) => write!(f, "@{}", handle),
            FeedTarget::List(id) => write!(f, "list {}", id),
        }
    }
}

/// Channel-level metadata of a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMetadata {
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: String,
}

impl FeedMetadata {
    /// Metadata for `target`, using the overrides when present
    pub fn for_target(
        target: &FeedTarget,
        base_url: &str,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            title: title.unwrap_or_else(|| target.default_title()),
            description: description.unwrap_or_else(|| target.default_description()),
            link: target.link(base_url),
            language: "en".to_string(),
        }
    }
}
