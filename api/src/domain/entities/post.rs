//! Post record domain entity
//!
//! The normalized shape of one upstream post. Platform payloads are adapted
//! into this type by the post fetcher and never travel further.

/// A media attachment on a post, in upstream order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    /// Upstream media kind: "photo", "video", "animated_gif"
    pub media_type: String,
    pub url: String,
}

/// Engagement counters; each one may be missing upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engagement {
    pub likes: Option<u64>,
    pub reposts: Option<u64>,
    pub replies: Option<u64>,
}

impl Engagement {
    pub fn is_empty(&self) -> bool {
        self.likes.is_none() && self.reposts.is_none() && self.replies.is_none()
    }
}

/// One post ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    /// Platform post id, unique within a feed
    pub id: String,
    pub author_handle: String,
    pub author_name: Option<String>,
    pub text: String,
    /// Raw creation timestamp as the platform sent it; may be malformed
    pub created_at: Option<String>,
    pub media: Vec<MediaAttachment>,
    pub engagement: Engagement,
}

impl PostRecord {
    pub fn new(
        id: impl Into<String>,
        author_handle: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            author_handle: author_handle.into(),
            author_name: None,
            text: text.into(),
            created_at: None,
            media: Vec::new(),
            engagement: Engagement::default(),
        }
    }
}
