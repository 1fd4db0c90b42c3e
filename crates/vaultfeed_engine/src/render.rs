use std::path::Path;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use vaultfeed_core::{Entry, EntryLists};

use crate::persist::{AtomicFileWriter, PersistError};

/// RFC 1123 date as used by RSS `pubDate`, always in GMT.
const RSS_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to build feed document: {0}")]
    Xml(String),
    #[error("failed to write feed to {path:?}: {source}")]
    Write {
        path: std::path::PathBuf,
        source: PersistError,
    },
}

/// Channel-level metadata of the generated feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedChannel {
    pub title: String,
    /// Site root; item links and guids are built beneath it.
    pub site: String,
    pub description: String,
    pub language: String,
    pub ttl_minutes: u32,
}

impl Default for FeedChannel {
    fn default() -> Self {
        Self {
            title: "Audiovault".to_string(),
            site: "https://www.audiovault.net".to_string(),
            description: "Audiovault RSS Feed powered by Oriol Gomez.com".to_string(),
            language: "en-us".to_string(),
            ttl_minutes: 60,
        }
    }
}

impl FeedChannel {
    fn site_root(&self) -> &str {
        self.site.trim_end_matches('/')
    }

    pub fn download_link(&self, entry: &Entry) -> String {
        format!("{}/download/{}", self.site_root(), entry.id)
    }

    pub fn guid(&self, entry: &Entry) -> String {
        format!("{}/{}/{}", self.site_root(), entry.kind.label(), entry.id)
    }
}

/// Serializes the novel entries of one run as an RSS 2.0 document.
#[derive(Debug, Clone, Default)]
pub struct FeedRenderer {
    channel: FeedChannel,
}

impl FeedRenderer {
    pub fn new(channel: FeedChannel) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &FeedChannel {
        &self.channel
    }

    /// Movies are listed before shows. Shows have no stored discovery time,
    /// so their `pubDate` is the render time.
    pub fn render(&self, novel: &EntryLists, rendered_at: DateTime<Utc>) -> Result<String, RenderError> {
        let now = format_rss_date(rendered_at);
        let mut doc = FeedWriter::new();

        doc.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        doc.event(Event::Start(rss))?;
        doc.event(Event::Start(BytesStart::new("channel")))?;

        let channel = &self.channel;
        doc.text_element("title", &channel.title)?;
        doc.text_element("link", &channel.site)?;
        doc.text_element("description", &channel.description)?;
        doc.text_element("language", &channel.language)?;
        doc.text_element("lastBuildDate", &now)?;
        doc.text_element("pubDate", &now)?;
        doc.text_element("ttl", &channel.ttl_minutes.to_string())?;

        for entry in novel.movies.iter().chain(&novel.shows) {
            let published = entry
                .discovered_at
                .filter(|_| entry.kind.records_discovery_time())
                .map_or_else(|| now.clone(), format_rss_date);
            doc.event(Event::Start(BytesStart::new("item")))?;
            doc.text_element("title", &format!("{}: {}", entry.kind.label(), entry.name))?;
            doc.text_element("link", &channel.download_link(entry))?;
            doc.text_element("guid", &channel.guid(entry))?;
            doc.text_element("pubDate", &published)?;
            doc.event(Event::End(BytesEnd::new("item")))?;
        }

        doc.event(Event::End(BytesEnd::new("channel")))?;
        doc.event(Event::End(BytesEnd::new("rss")))?;
        doc.finish()
    }

    /// Replace the feed file at `path` with `document`.
    pub fn write(&self, document: &str, path: &Path) -> Result<(), RenderError> {
        AtomicFileWriter::new(path)
            .write(document)
            .map_err(|source| RenderError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(())
    }
}

pub fn format_rss_date(at: DateTime<Utc>) -> String {
    at.format(RSS_DATE_FORMAT).to_string()
}

struct FeedWriter {
    inner: Writer<Vec<u8>>,
}

impl FeedWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        self.inner
            .write_event(event)
            .map_err(|err| RenderError::Xml(err.to_string()))
    }

    /// `<name>text</name>` with `text` escaped.
    fn text_element(&mut self, name: &str, text: &str) -> Result<(), RenderError> {
        self.event(Event::Start(BytesStart::new(name)))?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn finish(self) -> Result<String, RenderError> {
        let mut bytes = self.inner.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|err| RenderError::Xml(err.to_string()))
    }
}
