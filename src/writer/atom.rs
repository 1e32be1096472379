//! `<feed>` documents: Atom 0.3 and Atom 1.0.
//!
//! The two versions share a shape but not a vocabulary:
//!
//! | model            | Atom 0.3      | Atom 1.0      |
//! |------------------|---------------|---------------|
//! | description      | `tagline`     | `subtitle`    |
//! | copyright        | `copyright`   | `rights`      |
//! | channel date     | `modified`    | `updated`     |
//! | item date        | `issued`      | `published`   |
//! | categories       | `dc:subject`  | `category`    |

use crate::date::to_rfc3339;
use crate::error::FeedError;
use crate::format::namespace::{ATOM03, ATOM10, DC};
use crate::format::FeedFormat;
use crate::model::{Channel, Item};
use crate::xml::XmlSink;

struct Vocabulary {
    description: &'static str,
    copyright: &'static str,
    channel_date: &'static str,
    item_date: &'static str,
}

const ATOM03_TERMS: Vocabulary = Vocabulary {
    description: "tagline",
    copyright: "copyright",
    channel_date: "modified",
    item_date: "issued",
};

const ATOM10_TERMS: Vocabulary = Vocabulary {
    description: "subtitle",
    copyright: "rights",
    channel_date: "updated",
    item_date: "published",
};

pub(super) fn render(sink: &mut XmlSink, channel: &Channel, format: FeedFormat) -> Result<(), FeedError> {
    let legacy = format == FeedFormat::Atom03;
    let vocabulary = if legacy { &ATOM03_TERMS } else { &ATOM10_TERMS };

    if legacy {
        sink.open(
            "feed",
            &[("version", "0.3"), ("xmlns", ATOM03), ("xmlns:dc", DC)],
        )?;
    } else {
        sink.open("feed", &[("xmlns", ATOM10)])?;
    }

    sink.text("title", &channel.title)?;
    sink.text(vocabulary.description, &channel.description)?;
    render_links(sink, &channel.links, legacy)?;
    if !legacy {
        if let Some(id) = channel.links.first() {
            sink.text("id", id)?;
        }
    }
    if let Some(copyright) = &channel.copyright {
        sink.text(vocabulary.copyright, copyright)?;
    }
    if let Some(published) = channel.published {
        sink.text(vocabulary.channel_date, &to_rfc3339(published))?;
    }
    render_authors(sink, &channel.authors)?;
    render_categories(sink, &channel.categories, legacy)?;

    for item in &channel.items {
        render_entry(sink, item, vocabulary, legacy)?;
    }

    sink.close("feed")
}

fn render_entry(
    sink: &mut XmlSink,
    item: &Item,
    vocabulary: &Vocabulary,
    legacy: bool,
) -> Result<(), FeedError> {
    sink.open("entry", &[])?;
    sink.text_if_present("title", &item.title)?;
    render_links(sink, &item.links, legacy)?;
    if let Some(id) = item.links.first() {
        sink.text("id", id)?;
    }
    sink.text_if_present("summary", &item.description)?;
    render_authors(sink, &item.authors)?;
    render_categories(sink, &item.categories, legacy)?;
    if let Some(published) = item.published {
        sink.text(vocabulary.item_date, &to_rfc3339(published))?;
    }
    if let Some(updated) = item.updated {
        sink.text("updated", &to_rfc3339(updated))?;
    }
    sink.close("entry")
}

fn render_links(sink: &mut XmlSink, links: &[String], legacy: bool) -> Result<(), FeedError> {
    for link in links {
        if legacy {
            sink.empty(
                "link",
                &[("rel", "alternate"), ("type", "text/html"), ("href", link.as_str())],
            )?;
        } else {
            sink.empty("link", &[("rel", "alternate"), ("href", link.as_str())])?;
        }
    }
    Ok(())
}

fn render_authors(sink: &mut XmlSink, authors: &[String]) -> Result<(), FeedError> {
    for author in authors {
        sink.open("author", &[])?;
        sink.text("name", author)?;
        sink.close("author")?;
    }
    Ok(())
}

fn render_categories(sink: &mut XmlSink, categories: &[String], legacy: bool) -> Result<(), FeedError> {
    if legacy {
        return sink.texts("dc:subject", categories);
    }
    for category in categories {
        sink.empty("category", &[("term", category.as_str())])?;
    }
    Ok(())
}
