//! RSS 2.0 and Atom 1.0 serialization of a `FeedDocument`

use std::io::Cursor;

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::RenderError;
use crate::feed::renderer::{FeedDocument, FeedEntry};

const RSS_DOCS: &str = "http://www.rssboard.org/rss-specification";
const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

impl FeedDocument {
    pub fn to_rss(&self) -> Result<String, RenderError> {
        let mut out = XmlOut::new();
        out.declaration()?;
        out.start("rss", &[("version", "2.0")])?;
        out.start("channel", &[])?;

        let channel = &self.channel;
        out.text_element("title", &channel.title)?;
        out.text_element("link", &channel.link)?;
        out.text_element("description", &channel.description)?;
        out.text_element("docs", RSS_DOCS)?;
        out.text_element("generator", &channel.generator)?;
        out.text_element("language", &channel.language)?;
        out.text_element("lastBuildDate", &channel.built_at.to_rfc2822())?;

        for entry in &self.entries {
            write_rss_item(&mut out, entry)?;
        }

        out.end("channel")?;
        out.end("rss")?;
        out.finish()
    }

    pub fn to_atom(&self) -> Result<String, RenderError> {
        let mut out = XmlOut::new();
        out.declaration()?;

        let channel = &self.channel;
        out.start("feed", &[("xmlns", ATOM_NS), ("xml:lang", channel.language.as_str())])?;
        out.text_element("id", &channel.id)?;
        out.text_element("title", &channel.title)?;
        out.text_element("updated", &atom_date(self.updated()))?;
        out.empty("link", &[("href", channel.link.as_str()), ("rel", "alternate")])?;
        out.text_element("generator", &channel.generator)?;
        out.text_element("subtitle", &channel.description)?;

        for entry in &self.entries {
            write_atom_entry(&mut out, entry)?;
        }

        out.end("feed")?;
        out.finish()
    }
}

fn write_rss_item(out: &mut XmlOut, entry: &FeedEntry) -> Result<(), RenderError> {
    out.start("item", &[])?;
    out.text_element("title", &entry.title)?;
    out.text_element("link", &entry.link)?;
    out.text_element("description", &entry.description)?;
    out.text_element(
        "author",
        &format!("{} ({})", entry.author.email, entry.author.name),
    )?;
    out.start("guid", &[("isPermaLink", "false")])?;
    out.text(&entry.id)?;
    out.end("guid")?;
    out.text_element("pubDate", &entry.published.to_rfc2822())?;
    out.end("item")
}

fn write_atom_entry(out: &mut XmlOut, entry: &FeedEntry) -> Result<(), RenderError> {
    let published = atom_date(entry.published);

    out.start("entry", &[])?;
    out.text_element("id", &entry.id)?;
    out.text_element("title", &entry.title)?;
    out.text_element("updated", &published)?;
    out.start("author", &[])?;
    out.text_element("name", &entry.author.name)?;
    out.text_element("email", &entry.author.email)?;
    out.end("author")?;
    out.empty("link", &[("href", entry.link.as_str()), ("rel", "alternate")])?;
    out.start("summary", &[("type", "html")])?;
    out.text(&entry.description)?;
    out.end("summary")?;
    out.text_element("published", &published)?;
    out.end("entry")
}

fn atom_date(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn xml_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Xml(e.to_string())
}

/// Thin wrapper over an indenting quick-xml writer
struct XmlOut {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        self.writer.write_event(event).map_err(xml_err)
    }

    fn declaration(&mut self) -> Result<(), RenderError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), RenderError> {
        let mut start = BytesStart::new(name);
        for attr in attrs {
            start.push_attribute(*attr);
        }
        self.write(Event::Start(start))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), RenderError> {
        let mut element = BytesStart::new(name);
        for attr in attrs {
            element.push_attribute(*attr);
        }
        self.write(Event::Empty(element))
    }

    fn end(&mut self, name: &str) -> Result<(), RenderError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Escaped character data
    fn text(&mut self, text: &str) -> Result<(), RenderError> {
        self.write(Event::Text(BytesText::new(text)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), RenderError> {
        self.start(name, &[])?;
        self.text(text)?;
        self.end(name)
    }

    fn finish(self) -> Result<String, RenderError> {
        Ok(String::from_utf8(self.writer.into_inner().into_inner())?)
    }
}
