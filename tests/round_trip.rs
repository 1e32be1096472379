//! Integration tests for write-then-read round trips across every format.
//!
//! Each test builds a channel through the public API, writes it with the
//! manager, reads the bytes back through format detection, and compares
//! against the capability projection of the original.

use chrono::{DateTime, TimeZone, Utc};
use feedforge::{project, Channel, FeedError, FeedFormat, FeedManager, FormatFactory};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn round_trip(channel: &Channel) -> Channel {
    let manager = FeedManager::new();
    let mut bytes = Vec::new();
    manager.write_feed(&mut bytes, channel).unwrap();
    manager.read_feed(bytes.as_slice(), true).unwrap()
}

fn minimal_channel(format: FeedFormat) -> Channel {
    let mut channel = FormatFactory::bound(format).create_channel();
    channel.title = "Minimal".into();
    channel.description = "Only the required fields".into();
    channel.links.push("http://example.com/".into());
    channel
}

/// A channel with every field set and four items, from complete to empty.
fn rich_channel(format: FeedFormat) -> Channel {
    let factory = FormatFactory::bound(format);
    let mut channel = factory.create_channel();
    channel.title = "Rich Channel".into();
    channel.description = "Every field populated".into();
    channel.links = vec![
        "http://example.com/".into(),
        "http://example.com/mirror".into(),
    ];
    channel.categories = vec!["tech".into(), "rust".into()];
    channel.copyright = Some("Copyright 2024 Example".into());
    channel.set_published(Some(Utc.timestamp_opt(1_704_067_200, 987_000_000).unwrap()));
    channel.authors = vec!["editor@example.com".into(), "second@example.com".into()];

    let mut full = factory.create_item(&channel);
    full.title = "Full item".into();
    full.description = "Has everything".into();
    full.links = vec!["http://example.com/1".into(), "http://example.com/1b".into()];
    full.categories = vec!["a".into(), "b".into(), "c".into()];
    full.authors = vec!["ann@example.com".into(), "bob@example.com".into()];
    full.published = Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap());
    full.updated = Some(Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap());
    channel.add_item(full);

    let mut partial = factory.create_item(&channel);
    partial.title = "Partial item".into();
    partial.links.push("http://example.com/2".into());
    partial.published = Some(Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap());
    channel.add_item(partial);

    let mut description_only = factory.create_item(&channel);
    description_only.description = "No title, no link".into();
    channel.add_item(description_only);

    let mut title_only = factory.create_item(&channel);
    title_only.title = "Title only".into();
    channel.add_item(title_only);

    channel
}

// ============================================================================
// Minimal and rich channels
// ============================================================================

#[test]
fn test_minimal_channel_round_trips_for_non_legacy_formats() {
    for format in FeedFormat::ALL.into_iter().filter(|f| !f.is_legacy()) {
        let channel = minimal_channel(format);
        assert_eq!(round_trip(&channel), channel, "{format}");
    }
}

#[test]
fn test_rich_channel_reads_back_as_projection() {
    for format in FeedFormat::ALL {
        let channel = rich_channel(format);
        let read = round_trip(&channel);
        assert_eq!(read, project(&channel, format), "{format}");
        assert_eq!(read.format, Some(format));
        assert_eq!(read.items.len(), 4, "{format}");
    }
}

#[test]
fn test_items_read_back_bound_to_their_channel() {
    let read = round_trip(&rich_channel(FeedFormat::Rss20));
    for item in &read.items {
        assert_eq!(item.channel(), Some(read.id()));
    }
}

#[test]
fn test_atom03_keeps_only_first_author() {
    let mut channel = minimal_channel(FeedFormat::Atom03);
    channel.authors = vec!["First".into(), "Second".into()];

    let read = round_trip(&channel);
    assert_eq!(read.authors, vec!["First".to_string()]);
}

#[test]
fn test_subsecond_dates_are_truncated() {
    let mut channel = minimal_channel(FeedFormat::Atom10);
    channel.published = Some(Utc.timestamp_opt(1_700_000_000, 999_999_999).unwrap());

    let read = round_trip(&channel);
    assert_eq!(read.published, Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap()));
}

#[test]
fn test_sample_rss20_channel() {
    let factory = FormatFactory::new();
    let mut channel = factory.create_channel();
    channel.set_format_tag("rss_2.0").unwrap();
    channel.title = "Test Title".into();
    channel.description = "Test Description".into();
    channel.links.push("http://example.com/feed.xml".into());

    let mut item = factory.create_item(&channel);
    item.title = "Item 1".into();
    item.description = "d".into();
    item.links.push("http://example.com/1".into());
    channel.add_item(item);

    let read = round_trip(&channel);
    assert_eq!(read, channel);
    assert!(read.categories.is_empty());
    assert!(read.items[0].categories.is_empty());
}

#[test]
fn test_convert_between_formats() {
    let mut channel = round_trip(&rich_channel(FeedFormat::Atom10));
    channel.format = Some(FeedFormat::Rss20);

    let read = round_trip(&channel);
    assert_eq!(read, project(&channel, FeedFormat::Rss20));
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_unknown_writer_token() {
    let err = FormatFactory::new().writer_for("rss_9.9").unwrap_err();
    assert!(matches!(err, FeedError::UnknownFormat(_)));
}

#[test]
fn test_html_page_is_unsupported() {
    let html = r#"<?xml version="1.0"?>
<html xmlns="http://www.w3.org/1999/xhtml">
  <head><title>Not a feed</title></head>
  <body><p>Hello</p></body>
</html>"#;
    let err = FeedManager::new().read_feed(html.as_bytes(), true).unwrap_err();
    assert!(matches!(err, FeedError::UnsupportedFormat(_)));
}

#[test]
fn test_legacy_format_without_items_is_rejected() {
    let channel = minimal_channel(FeedFormat::Rss091Userland);
    let mut bytes = Vec::new();
    let err = FeedManager::new().write_feed(&mut bytes, &channel).unwrap_err();
    assert!(matches!(err, FeedError::Validation { ref field, .. } if field == "items"));
    assert!(bytes.is_empty());
}

// ============================================================================
// Text fidelity
// ============================================================================

#[test]
fn test_surrounding_whitespace_survives_round_trip() {
    for format in FeedFormat::ALL {
        let factory = FormatFactory::bound(format);
        let mut channel = factory.create_channel();
        channel.title = "  padded title  ".into();
        channel.description = "\tindented description\n".into();
        channel.links.push(" http://example.com/ ".into());

        let mut item = factory.create_item(&channel);
        item.title = " ".into();
        item.description = "line1\n".into();
        item.links.push("http://example.com/1\n".into());
        channel.add_item(item);

        let read = round_trip(&channel);
        assert_eq!(read, project(&channel, format), "{format}");
        assert_eq!(read.title, "  padded title  ", "{format}");
    }
}

#[test]
fn test_markup_characters_survive_round_trip() {
    let mut channel = minimal_channel(FeedFormat::Atom10);
    channel.title = r#"<b>Tom & "Jerry's"</b>"#.into();
    channel.categories = vec!["a&b".into(), "<c>".into(), "\"d'".into()];
    channel.links = vec!["http://example.com/?a=1&b=\"2\"".into()];

    assert_eq!(round_trip(&channel), channel);
}

#[test]
fn test_empty_list_values_are_not_written() {
    let mut channel = minimal_channel(FeedFormat::Atom10);
    channel.categories = vec!["".into(), "x".into()];

    let mut bytes = Vec::new();
    FeedManager::new().write_feed(&mut bytes, &channel).unwrap();
    let xml = String::from_utf8(bytes).unwrap();
    assert!(!xml.contains("term=\"\""));

    let read = round_trip(&channel);
    assert_eq!(read.categories, vec!["x".to_string()]);
    assert_eq!(read, project(&channel, FeedFormat::Atom10));
}

// ============================================================================
// Property: read(write(C)) == project(C)
// ============================================================================

/// Printable text, possibly empty, possibly padded with whitespace.
fn text() -> impl Strategy<Value = String> {
    let body = prop_oneof![
        "\\PC{0,16}",
        "[a-zA-Z0-9 &<>\"'é☕]{0,16}",
    ];
    ("[ \t\n]{0,2}", body, "[ \t\n]{0,2}").prop_map(|(lead, body, tail)| format!("{lead}{body}{tail}"))
}

/// Text that passes required-field validation.
fn required_text() -> impl Strategy<Value = String> {
    text().prop_filter("must not be blank", |s| !s.trim().is_empty())
}

fn list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(text(), 0..4)
}

/// Whole seconds between 2000 and 2100 plus a sub-second part to truncate.
fn date() -> impl Strategy<Value = Option<DateTime<Utc>>> {
    prop::option::of(
        (946_684_800i64..4_102_444_800i64, 0u32..1_000_000_000)
            .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap()),
    )
}

type ItemParts = (String, String, Vec<String>, Vec<String>, Vec<String>, Option<DateTime<Utc>>, Option<DateTime<Utc>>);

fn item_parts() -> impl Strategy<Value = ItemParts> {
    (text(), text(), list(), list(), list(), date(), date())
}

proptest! {
    #[test]
    fn prop_round_trip_matches_projection(
        format in prop::sample::select(FeedFormat::ALL.to_vec()),
        title in required_text(),
        description in required_text(),
        link in required_text(),
        extra_links in list(),
        categories in list(),
        authors in list(),
        copyright in prop::option::of(text()),
        published in date(),
        items in prop::collection::vec(item_parts(), 1..5),
    ) {
        let factory = FormatFactory::bound(format);
        let mut channel = factory.create_channel();
        channel.title = title;
        channel.description = description;
        channel.links.push(link);
        channel.links.extend(extra_links);
        channel.categories = categories;
        channel.authors = authors;
        channel.copyright = copyright;
        channel.published = published;

        for (title, description, links, categories, authors, published, updated) in items {
            let mut item = factory.create_item(&channel);
            item.title = title;
            item.description = description;
            item.links = links;
            item.categories = categories;
            item.authors = authors;
            item.published = published;
            item.updated = updated;
            channel.add_item(item);
        }

        let read = round_trip(&channel);
        prop_assert_eq!(read, project(&channel, format));
    }
}
