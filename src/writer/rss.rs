//! `<rss version="…">` documents: 0.91 (both variants), 0.92–0.94 and 2.0.

use crate::date::to_rfc822;
use crate::error::FeedError;
use crate::format::FeedFormat;
use crate::model::{Channel, Item};
use crate::xml::XmlSink;

const NETSCAPE_DOCTYPE: &str = r#"rss PUBLIC "-//Netscape Communications//DTD RSS 0.91//EN" "http://my.netscape.com/publish/formats/rss-0.91.dtd""#;

pub(super) fn render(sink: &mut XmlSink, channel: &Channel, format: FeedFormat) -> Result<(), FeedError> {
    if format == FeedFormat::Rss091Netscape {
        sink.doctype(NETSCAPE_DOCTYPE)?;
    }
    let version = format.version_attribute().unwrap_or("2.0");
    sink.open("rss", &[("version", version)])?;
    sink.open("channel", &[])?;

    sink.text("title", &channel.title)?;
    if let Some(link) = channel.links.first() {
        sink.text("link", link)?;
    }
    sink.text("description", &channel.description)?;
    if let Some(copyright) = &channel.copyright {
        sink.text("copyright", copyright)?;
    }
    if let Some(published) = channel.published {
        sink.text("pubDate", &to_rfc822(published))?;
    }
    if let Some(author) = channel.authors.first() {
        sink.text("managingEditor", author)?;
    }
    sink.texts("category", &channel.categories)?;

    for item in &channel.items {
        render_item(sink, item)?;
    }

    sink.close("channel")?;
    sink.close("rss")
}

fn render_item(sink: &mut XmlSink, item: &Item) -> Result<(), FeedError> {
    sink.open("item", &[])?;
    sink.text_if_present("title", &item.title)?;
    if let Some(link) = item.links.first() {
        sink.text("link", link)?;
    }
    sink.text_if_present("description", &item.description)?;
    if let Some(author) = item.authors.first() {
        sink.text("author", author)?;
    }
    sink.texts("category", &item.categories)?;
    if let Some(published) = item.published {
        sink.text("pubDate", &to_rfc822(published))?;
    }
    sink.close("item")
}
