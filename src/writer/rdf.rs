//! `<rdf:RDF>` documents: RSS 0.90 and RSS 1.0.

use crate::date::to_rfc3339;
use crate::error::FeedError;
use crate::format::namespace::{DC, RDF, RSS090, RSS10};
use crate::format::FeedFormat;
use crate::model::{Channel, Item};
use crate::xml::XmlSink;

pub(super) fn render(sink: &mut XmlSink, channel: &Channel, format: FeedFormat) -> Result<(), FeedError> {
    let rss10 = format == FeedFormat::Rss10;
    let link = channel.links.first().map(String::as_str);

    if rss10 {
        sink.open(
            "rdf:RDF",
            &[("xmlns:rdf", RDF), ("xmlns", RSS10), ("xmlns:dc", DC)],
        )?;
        match link {
            Some(about) => sink.open("channel", &[("rdf:about", about)])?,
            None => sink.open("channel", &[])?,
        }
    } else {
        sink.open("rdf:RDF", &[("xmlns:rdf", RDF), ("xmlns", RSS090)])?;
        sink.open("channel", &[])?;
    }

    sink.text("title", &channel.title)?;
    if let Some(link) = link {
        sink.text("link", link)?;
    }
    sink.text("description", &channel.description)?;

    if rss10 {
        if let Some(rights) = &channel.copyright {
            sink.text("dc:rights", rights)?;
        }
        if let Some(published) = channel.published {
            sink.text("dc:date", &to_rfc3339(published))?;
        }
        if let Some(creator) = channel.authors.first() {
            sink.text("dc:creator", creator)?;
        }
        sink.texts("dc:subject", &channel.categories)?;
        render_table_of_contents(sink, &channel.items)?;
    }
    sink.close("channel")?;

    for item in &channel.items {
        render_item(sink, item, rss10)?;
    }

    sink.close("rdf:RDF")
}

/// RSS 1.0 lists the item URIs in an `rdf:Seq` inside the channel.
fn render_table_of_contents(sink: &mut XmlSink, items: &[Item]) -> Result<(), FeedError> {
    sink.open("items", &[])?;
    sink.open("rdf:Seq", &[])?;
    for link in items.iter().filter_map(|item| item.links.first()) {
        sink.empty("rdf:li", &[("rdf:resource", link.as_str())])?;
    }
    sink.close("rdf:Seq")?;
    sink.close("items")
}

fn render_item(sink: &mut XmlSink, item: &Item, rss10: bool) -> Result<(), FeedError> {
    let link = item.links.first();
    match link {
        Some(about) if rss10 => sink.open("item", &[("rdf:about", about.as_str())])?,
        _ => sink.open("item", &[])?,
    }
    sink.text_if_present("title", &item.title)?;
    if let Some(link) = link {
        sink.text("link", link)?;
    }
    if rss10 {
        sink.text_if_present("description", &item.description)?;
        if let Some(creator) = item.authors.first() {
            sink.text("dc:creator", creator)?;
        }
        if let Some(published) = item.published {
            sink.text("dc:date", &to_rfc3339(published))?;
        }
    }
    sink.close("item")
}

#[cfg(test)]
mod tests {
    use crate::format::FeedFormat;
    use crate::model::{Channel, Item};
    use crate::writer::FeedWriter;
    use chrono::{TimeZone, Utc};

    fn channel() -> Channel {
        let mut channel = Channel::new();
        channel.title = "Title".into();
        channel.description = "Description".into();
        channel.links.push("http://example.com/".into());
        channel.categories = vec!["a".into(), "b".into()];
        channel.authors.push("Jane".into());
        channel.copyright = Some("CC-BY".into());
        channel.published = Some(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap());

        let mut item = Item::for_channel(&channel);
        item.title = "One".into();
        item.description = "First".into();
        item.links.push("http://example.com/1".into());
        item.authors.push("John".into());
        item.published = Some(Utc.with_ymd_and_hms(2024, 5, 7, 0, 0, 0).unwrap());
        channel.add_item(item);
        channel
    }

    #[test]
    fn test_rss10_uses_dublin_core_and_sequence() {
        let out = FeedWriter::new(FeedFormat::Rss10).render_string(&channel()).unwrap();
        assert!(out.contains("xmlns=\"http://purl.org/rss/1.0/\""));
        assert!(out.contains("<channel rdf:about=\"http://example.com/\">"));
        assert!(out.contains("<dc:subject>a</dc:subject>"));
        assert!(out.contains("<dc:rights>CC-BY</dc:rights>"));
        assert!(out.contains("<dc:date>2024-05-06T07:08:09Z</dc:date>"));
        assert!(out.contains("<rdf:li rdf:resource=\"http://example.com/1\"/>"));
        assert!(out.contains("<item rdf:about=\"http://example.com/1\">"));
        assert!(out.contains("<dc:creator>John</dc:creator>"));
        // items are siblings of the channel
        assert!(out.find("</channel>").unwrap() < out.find("<item ").unwrap());
    }

    #[test]
    fn test_rss090_is_minimal() {
        let out = FeedWriter::new(FeedFormat::Rss090).render_string(&channel()).unwrap();
        assert!(out.contains("xmlns=\"http://my.netscape.com/rdf/simple/0.9/\""));
        assert!(!out.contains("dc:"));
        assert!(!out.contains("rdf:about"));
        assert!(!out.contains("First"));
        assert!(out.contains("<title>One</title>"));
    }
}
