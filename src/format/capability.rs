//! Per-format field support and cardinality.
//!
//! A field missing from a format's row is silently dropped on write and left
//! at its default on read. Multi-valued fields with cardinality [`One`]
//! keep their first value.
//!
//! [`One`]: Cardinality::One

use chrono::{DateTime, Utc};

use super::FeedFormat;
use crate::date::truncate;
use crate::model::{Channel, Item};

/// A model field that a format may or may not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ChannelTitle,
    ChannelDescription,
    ChannelLinks,
    ChannelCategories,
    ChannelCopyright,
    ChannelPublished,
    ChannelAuthors,
    ItemTitle,
    ItemDescription,
    ItemLinks,
    ItemCategories,
    ItemAuthors,
    ItemPublished,
    ItemUpdated,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::ChannelTitle,
        Field::ChannelDescription,
        Field::ChannelLinks,
        Field::ChannelCategories,
        Field::ChannelCopyright,
        Field::ChannelPublished,
        Field::ChannelAuthors,
        Field::ItemTitle,
        Field::ItemDescription,
        Field::ItemLinks,
        Field::ItemCategories,
        Field::ItemAuthors,
        Field::ItemPublished,
        Field::ItemUpdated,
    ];
}

/// How many values of a field a format can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Unbounded,
}

use Cardinality::{One, Unbounded};
use Field::*;

type Row = &'static [(Field, Cardinality)];

const RSS_090: Row = &[
    (ChannelTitle, One),
    (ChannelDescription, One),
    (ChannelLinks, One),
    (ItemTitle, One),
    (ItemLinks, One),
];

const RSS_091: Row = &[
    (ChannelTitle, One),
    (ChannelDescription, One),
    (ChannelLinks, One),
    (ChannelCopyright, One),
    (ChannelPublished, One),
    (ItemTitle, One),
    (ItemDescription, One),
    (ItemLinks, One),
];

// 0.92 through 0.94 share a row: item categories arrive, item dates do not.
const RSS_092: Row = &[
    (ChannelTitle, One),
    (ChannelDescription, One),
    (ChannelLinks, One),
    (ChannelCopyright, One),
    (ChannelPublished, One),
    (ItemTitle, One),
    (ItemDescription, One),
    (ItemLinks, One),
    (ItemCategories, Unbounded),
];

const RSS_10: Row = &[
    (ChannelTitle, One),
    (ChannelDescription, One),
    (ChannelLinks, One),
    (ChannelCategories, Unbounded),
    (ChannelCopyright, One),
    (ChannelPublished, One),
    (ChannelAuthors, One),
    (ItemTitle, One),
    (ItemDescription, One),
    (ItemLinks, One),
    (ItemAuthors, One),
    (ItemPublished, One),
];

const RSS_20: Row = &[
    (ChannelTitle, One),
    (ChannelDescription, One),
    (ChannelLinks, One),
    (ChannelCategories, Unbounded),
    (ChannelCopyright, One),
    (ChannelPublished, One),
    (ChannelAuthors, One),
    (ItemTitle, One),
    (ItemDescription, One),
    (ItemLinks, One),
    (ItemCategories, Unbounded),
    (ItemAuthors, One),
    (ItemPublished, One),
];

const ATOM_03: Row = &[
    (ChannelTitle, One),
    (ChannelDescription, One),
    (ChannelLinks, Unbounded),
    (ChannelCategories, Unbounded),
    (ChannelCopyright, One),
    (ChannelPublished, One),
    (ChannelAuthors, One),
    (ItemTitle, One),
    (ItemDescription, One),
    (ItemLinks, Unbounded),
    (ItemAuthors, One),
    (ItemPublished, One),
];

const ATOM_10: Row = &[
    (ChannelTitle, One),
    (ChannelDescription, One),
    (ChannelLinks, Unbounded),
    (ChannelCategories, Unbounded),
    (ChannelCopyright, One),
    (ChannelPublished, One),
    (ChannelAuthors, Unbounded),
    (ItemTitle, One),
    (ItemDescription, One),
    (ItemLinks, Unbounded),
    (ItemCategories, Unbounded),
    (ItemAuthors, Unbounded),
    (ItemPublished, One),
    (ItemUpdated, One),
];

fn row(format: FeedFormat) -> Row {
    match format {
        FeedFormat::Rss090 => RSS_090,
        FeedFormat::Rss091Netscape | FeedFormat::Rss091Userland => RSS_091,
        FeedFormat::Rss092 | FeedFormat::Rss093 | FeedFormat::Rss094 => RSS_092,
        FeedFormat::Rss10 => RSS_10,
        FeedFormat::Rss20 => RSS_20,
        FeedFormat::Atom03 => ATOM_03,
        FeedFormat::Atom10 => ATOM_10,
    }
}

/// Cardinality of `field` in `format`, or `None` when the format lacks it.
pub fn max_cardinality(format: FeedFormat, field: Field) -> Option<Cardinality> {
    row(format)
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, cardinality)| *cardinality)
}

pub fn supports(format: FeedFormat, field: Field) -> bool {
    max_cardinality(format, field).is_some()
}

/// Returns the part of `channel` that survives a round trip through `format`.
///
/// Unsupported fields are reset to their defaults, empty values are removed
/// from multi-valued fields before they are clamped to the format's
/// cardinality, an empty copyright becomes `None`, and dates are truncated to
/// whole seconds. The format tag is kept. The result is a clone, so it has
/// its own [`ChannelId`](crate::ChannelId).
pub fn project(channel: &Channel, format: FeedFormat) -> Channel {
    let mut out = channel.clone();
    let p = Projection { format };

    p.text(&mut out.title, ChannelTitle);
    p.text(&mut out.description, ChannelDescription);
    p.list(&mut out.links, ChannelLinks);
    p.list(&mut out.categories, ChannelCategories);
    p.optional(&mut out.copyright, ChannelCopyright);
    p.date(&mut out.published, ChannelPublished);
    p.list(&mut out.authors, ChannelAuthors);

    for item in &mut out.items {
        p.item(item);
    }
    out
}

struct Projection {
    format: FeedFormat,
}

impl Projection {
    fn item(&self, item: &mut Item) {
        self.text(&mut item.title, ItemTitle);
        self.text(&mut item.description, ItemDescription);
        self.list(&mut item.links, ItemLinks);
        self.list(&mut item.categories, ItemCategories);
        self.list(&mut item.authors, ItemAuthors);
        self.date(&mut item.published, ItemPublished);
        self.date(&mut item.updated, ItemUpdated);
    }

    fn text(&self, value: &mut String, field: Field) {
        if !supports(self.format, field) {
            value.clear();
        }
    }

    fn optional(&self, value: &mut Option<String>, field: Field) {
        if !supports(self.format, field) || value.as_deref() == Some("") {
            *value = None;
        }
    }

    fn date(&self, value: &mut Option<DateTime<Utc>>, field: Field) {
        *value = if supports(self.format, field) {
            value.map(truncate)
        } else {
            None
        };
    }

    /// Readers never produce empty list entries, so they are not written.
    fn list(&self, values: &mut Vec<String>, field: Field) {
        values.retain(|value| !value.is_empty());
        match max_cardinality(self.format, field) {
            None => values.clear(),
            Some(Cardinality::One) if values.len() > 1 => {
                tracing::debug!(
                    format = %self.format,
                    field = ?field,
                    dropped = values.len() - 1,
                    "Keeping only the first value"
                );
                values.truncate(1);
            }
            Some(_) => {}
        }
    }
}
