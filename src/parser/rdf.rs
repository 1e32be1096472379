use crate::date::from_rfc3339;
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
    if channel.links.is_empty() {
        channel.links.extend(element.attr("rdf:about").map(str::to_string));
    }
    channel.copyright = optional_text(element, "dc:rights");
    channel.published = element.child_text("dc:date").and_then(from_rfc3339);
    channel.authors = element.child_texts("dc:creator");
    channel.categories = element.child_texts("dc:subject");

    // Items are siblings of <channel>, not children.
    for entry in root.children("item") {
        channel.add_item(parse_item(entry));
    }
    Ok(channel)
}

fn parse_item(element: &Element) -> Item {
    let mut links = element.child_texts("link");
    if links.is_empty() {
        links.extend(element.attr("rdf:about").map(str::to_string));
    }
    Item {
        title: text(element, "title"),
        description: text(element, "description"),
        published: element.child_text("dc:date").and_then(from_rfc3339),
        authors: element.child_texts("dc:creator"),
        categories: element.child_texts("dc:subject"),
        links,
        ..Item::default()
    }
}
