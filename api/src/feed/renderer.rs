//! Feed renderer
//!
//! Turns post records plus channel metadata into a `FeedDocument`. The
//! document is format-neutral; `feed::xml` serializes it as RSS or Atom.

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

use crate::domain::entities::{Engagement, FeedMetadata, PostRecord};
use crate::feed::timestamp::parse_timestamp;

/// Generator tag stamped on every document
pub const GENERATOR: &str = "birdfeed";

/// Body characters kept in an entry title before the ellipsis
pub const TITLE_MAX_CHARS: usize = 100;

pub const DEFAULT_BASE_URL: &str = "https://twitter.com";

/// Channel-level fields of a rendered feed
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub language: String,
    pub generator: String,
    /// When this document was rendered
    pub built_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// One rendered post
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub id: String,
    pub link: String,
    pub title: String,
    /// HTML fragment
    pub description: String,
    pub published: DateTime<Utc>,
    pub author: Author,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    pub channel: Channel,
    pub entries: Vec<FeedEntry>,
}

impl FeedDocument {
    /// Latest entry date, or the build time for an empty feed
    pub fn updated(&self) -> DateTime<Utc> {
        self.entries
            .iter()
            .map(|e| e.published)
            .max()
            .unwrap_or(self.channel.built_at)
    }
}

#[derive(Debug, Clone)]
pub struct FeedRenderer {
    base_url: String,
    email_domain: String,
}

impl Default for FeedRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl FeedRenderer {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let email_domain = host_of(&base_url).to_string();
        Self {
            base_url,
            email_domain,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Render one entry per post, in input order
    pub fn render(&self, metadata: &FeedMetadata, posts: &[PostRecord]) -> FeedDocument {
        let built_at = Utc::now();

        let channel = Channel {
            id: metadata.link.clone(),
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            link: metadata.link.clone(),
            language: metadata.language.clone(),
            generator: GENERATOR.to_string(),
            built_at,
        };

        let entries = posts
            .iter()
            .map(|post| self.render_entry(post, built_at))
            .collect();

        FeedDocument { channel, entries }
    }

    fn render_entry(&self, post: &PostRecord, now: DateTime<Utc>) -> FeedEntry {
        let link = format!(
            "{}/{}/status/{}",
            self.base_url, post.author_handle, post.id
        );

        let published = match post.created_at.as_deref().and_then(parse_timestamp) {
            Some(ts) => ts,
            None => {
                tracing::warn!(
                    post_id = %post.id,
                    created_at = post.created_at.as_deref().unwrap_or("<missing>"),
                    "Unparseable post timestamp, using render time"
                );
                now
            }
        };

        FeedEntry {
            id: link.clone(),
            link,
            title: entry_title(&post.author_handle, &post.text),
            description: entry_description(post),
            published,
            author: Author {
                name: format!("@{}", post.author_handle),
                email: format!("{}@{}", post.author_handle, self.email_domain),
            },
        }
    }
}

/// `@handle: text`, with text cut to `TITLE_MAX_CHARS` characters plus `...`
pub fn entry_title(handle: &str, text: &str) -> String {
    if text.chars().count() > TITLE_MAX_CHARS {
        let head: String = text.chars().take(TITLE_MAX_CHARS).collect();
        format!("@{}: {}...", handle, head)
    } else {
        format!("@{}: {}", handle, text)
    }
}

/// HTML body of an entry: text, media list, author and engagement lines
pub fn entry_description(post: &PostRecord) -> String {
    let mut html = format!("<p>{}</p>", escape(post.text.as_str()));

    if !post.media.is_empty() {
        html.push_str("<p><strong>Media:</strong></p><ul>");
        for media in &post.media {
            let url = escape(media.url.as_str());
            html.push_str(&format!(
                "<li>{}: <a href='{}'>{}</a></li>",
                escape(media.media_type.as_str()),
                url,
                url
            ));
        }
        html.push_str("</ul>");
    }

    html.push_str(&format!(
        "<p><strong>Author:</strong> @{}",
        escape(post.author_handle.as_str())
    ));
    if let Some(name) = &post.author_name {
        html.push_str(&format!(" ({})", escape(name.as_str())));
    }
    html.push_str("</p>");

    if let Some(line) = engagement_line(&post.engagement) {
        html.push_str(&line);
    }

    html
}

fn engagement_line(engagement: &Engagement) -> Option<String> {
    if engagement.is_empty() {
        return None;
    }

    let parts: Vec<String> = [
        ("Likes", engagement.likes),
        ("Retweets", engagement.reposts),
        ("Replies", engagement.replies),
    ]
    .into_iter()
    .filter_map(|(label, count)| count.map(|n| format!("<strong>{}:</strong> {}", label, n)))
    .collect();

    Some(format!("<p>{}</p>", parts.join(" | ")))
}

/// Host part of an absolute URL, without a leading `www.`
fn host_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = rest.split(['/', ':', '?']).next().unwrap_or(rest);
    host.strip_prefix("www.").unwrap_or(host)
}
