use std::fs;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use vaultfeed_core::{Entry, EntryLists};
use vaultfeed_engine::{FeedChannel, FeedRenderer, RenderError};

fn novel() -> EntryLists {
    EntryLists {
        shows: vec![Entry::show("101", "Show A"), Entry::show("102", "Show B")],
        movies: vec![Entry::movie(
            "201",
            "Movie X",
            Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap(),
        )],
    }
}

#[test]
fn renders_channel_and_one_item_per_entry() {
    let rendered_at = Utc.with_ymd_and_hms(2030, 1, 2, 6, 30, 0).unwrap();

    let doc = FeedRenderer::default().render(&novel(), rendered_at).unwrap();

    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Audiovault</title>
    <link>https://www.audiovault.net</link>
    <description>Audiovault RSS Feed powered by Oriol Gomez.com</description>
    <language>en-us</language>
    <lastBuildDate>Wed, 02 Jan 2030 06:30:00 GMT</lastBuildDate>
    <pubDate>Wed, 02 Jan 2030 06:30:00 GMT</pubDate>
    <ttl>60</ttl>
    <item>
      <title>movie: Movie X</title>
      <link>https://www.audiovault.net/download/201</link>
      <guid>https://www.audiovault.net/movie/201</guid>
      <pubDate>Tue, 01 Jan 2030 12:00:00 GMT</pubDate>
    </item>
    <item>
      <title>show: Show A</title>
      <link>https://www.audiovault.net/download/101</link>
      <guid>https://www.audiovault.net/show/101</guid>
      <pubDate>Wed, 02 Jan 2030 06:30:00 GMT</pubDate>
    </item>
    <item>
      <title>show: Show B</title>
      <link>https://www.audiovault.net/download/102</link>
      <guid>https://www.audiovault.net/show/102</guid>
      <pubDate>Wed, 02 Jan 2030 06:30:00 GMT</pubDate>
    </item>
  </channel>
</rss>
"#;
    assert_eq!(doc, expected);
}

#[test]
fn empty_run_still_renders_a_channel() {
    let rendered_at = Utc.with_ymd_and_hms(2030, 1, 2, 6, 30, 0).unwrap();

    let doc = FeedRenderer::default()
        .render(&EntryLists::new(), rendered_at)
        .unwrap();

    assert!(doc.contains("<channel>"));
    assert!(doc.contains("<ttl>60</ttl>"));
    assert!(!doc.contains("<item>"));
}

#[test]
fn names_with_markup_characters_are_escaped() {
    let rendered_at = Utc.with_ymd_and_hms(2030, 1, 2, 6, 30, 0).unwrap();
    let lists = EntryLists {
        shows: vec![Entry::show("7", "Tom & Jerry <Uncut>")],
        movies: Vec::new(),
    };

    let doc = FeedRenderer::default().render(&lists, rendered_at).unwrap();

    assert!(doc.contains("<title>show: Tom &amp; Jerry &lt;Uncut&gt;</title>"));
    assert!(!doc.contains("<Uncut>"));
}

#[test]
fn custom_channel_drives_links() {
    let rendered_at = Utc.with_ymd_and_hms(2030, 1, 2, 6, 30, 0).unwrap();
    let renderer = FeedRenderer::new(FeedChannel {
        title: "Mirror".to_string(),
        site: "https://mirror.example/".to_string(),
        ttl_minutes: 15,
        ..FeedChannel::default()
    });

    let doc = renderer.render(&novel(), rendered_at).unwrap();

    assert!(doc.contains("<title>Mirror</title>"));
    assert!(doc.contains("<link>https://mirror.example/download/201</link>"));
    assert!(doc.contains("<guid>https://mirror.example/show/102</guid>"));
    assert!(doc.contains("<ttl>15</ttl>"));
}

#[test]
fn show_pub_date_is_render_time_even_with_a_stored_timestamp() {
    let rendered_at = Utc.with_ymd_and_hms(2030, 1, 2, 6, 30, 0).unwrap();
    let mut show = Entry::show("101", "Show A");
    show.discovered_at = Some(Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap());
    let lists = EntryLists {
        shows: vec![show],
        movies: vec![],
    };

    let doc = FeedRenderer::default().render(&lists, rendered_at).unwrap();

    assert!(doc.contains("<pubDate>Wed, 02 Jan 2030 06:30:00 GMT</pubDate>"));
    assert!(!doc.contains("Tue, 01 Jan 2030"));
}

#[test]
fn write_overwrites_previous_feed() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("audiovault_feed.rss");
    fs::write(&path, "stale feed from last week").unwrap();
    let renderer = FeedRenderer::default();

    renderer.write("<rss/>\n", &path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "<rss/>\n");
}

#[test]
fn write_to_unwritable_destination_is_a_render_error() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();

    let err = FeedRenderer::default()
        .write("<rss/>", &blocker.join("feed.rss"))
        .unwrap_err();

    assert!(matches!(err, RenderError::Write { .. }));
}
