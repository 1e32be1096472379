use crate::date::from_rfc3339;
use crate::model::{Channel, Item};
use crate::xml::Element;

pub(super) fn parse(root: &Element) -> Channel {
    let mut channel = Channel::new();

    channel.title = text_construct(root, &["title"]);
    channel.description = text_construct(root, &["subtitle", "tagline"]);
    channel.links = alternate_links(root);
    channel.copyright = Some(text_construct(root, &["rights", "copyright"])).filter(|t| !t.is_empty());
    channel.published = date(root, &["updated", "modified"]);
    channel.authors = person_names(root);
    channel.categories = categories(root);

    for entry in root.children("entry") {
        channel.add_item(parse_entry(entry));
    }
    channel
}

fn parse_entry(element: &Element) -> Item {
    Item {
        title: text_construct(element, &["title"]),
        description: text_construct(element, &["summary", "content"]),
        published: date(element, &["published", "issued"]),
        updated: date(element, &["updated", "modified"]),
        categories: categories(element),
        authors: person_names(element),
        links: alternate_links(element),
        ..Item::default()
    }
}

/// Text of the first present element among `names`. XHTML constructs keep
/// their character data only.
fn text_construct(element: &Element, names: &[&str]) -> String {
    names
        .iter()
        .find_map(|name| element.child(name))
        .map(Element::deep_text)
        .unwrap_or_default()
}

fn date(element: &Element, names: &[&str]) -> Option<chrono::DateTime<chrono::Utc>> {
    names
        .iter()
        .find_map(|name| element.child_text(name))
        .and_then(from_rfc3339)
}

/// `href` of every `<link>` without a `rel` or with `rel="alternate"`.
fn alternate_links(element: &Element) -> Vec<String> {
    element
        .children("link")
        .filter(|link| matches!(link.attr("rel"), None | Some("alternate")))
        .filter_map(|link| link.attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

fn person_names(element: &Element) -> Vec<String> {
    element
        .children("author")
        .filter_map(|author| author.child_text("name"))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Atom 1.0 `category/@term` followed by Atom 0.3 style `dc:subject`.
fn categories(element: &Element) -> Vec<String> {
    let mut terms: Vec<String> = element
        .children("category")
        .filter_map(|category| category.attr("term"))
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect();
    terms.extend(element.child_texts("dc:subject"));
    terms
}
