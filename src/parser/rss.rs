use crate::date::from_rfc822;
use crate::error::FeedError;
use crate::model::{Channel, Item};
use crate::xml::Element;

use super::{channel_element, optional_text, text};

pub(super) fn parse(root: &Element, validate: bool) -> Result<Channel, FeedError> {
    let mut channel = Channel::new();
    let Some(element) = channel_element(root, validate)? else {
        return Ok(channel);
    };

    channel.title = text(element, "title");
    channel.description = text(element, "description");
    channel.links = element.child_texts("link");
    channel.categories = element.child_texts("category");
    channel.copyright = optional_text(element, "copyright");
    channel.published = element.child_text("pubDate").and_then(from_rfc822);
    channel.authors = element.child_texts("managingEditor");
    if channel.authors.is_empty() {
        channel.authors = element.child_texts("dc:creator");
    }

    for entry in element.children("item") {
        let item = parse_item(entry);
        channel.add_item(item);
    }
    Ok(channel)
}

fn parse_item(element: &Element) -> Item {
    let mut authors = element.child_texts("author");
    if authors.is_empty() {
        authors = element.child_texts("dc:creator");
    }
    Item {
        title: text(element, "title"),
        description: text(element, "description"),
        published: element.child_text("pubDate").and_then(from_rfc822),
        categories: element.child_texts("category"),
        authors,
        links: element.child_texts("link"),
        ..Item::default()
    }
}
