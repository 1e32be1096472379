//! Format-agnostic feed model.
//!
//! A [`Channel`] owns its [`Item`]s. Each item remembers which channel it was
//! created for through a [`ChannelId`]; the id is an association only and is
//! ignored by equality.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::date::truncate;
use crate::error::FeedError;
use crate::format::FeedFormat;

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a channel, used by items as a non-owning back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u64);

impl ChannelId {
    fn next() -> Self {
        ChannelId(NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One syndication feed.
///
/// Cloning yields a new channel with its own [`ChannelId`]. Items bound to
/// the source are rebound to the clone; items bound elsewhere stay foreign.
#[derive(Debug, Serialize)]
pub struct Channel {
    #[serde(skip)]
    pub(crate) id: ChannelId,
    /// Target (or detected) wire format. Writing fails while this is unset.
    pub format: Option<FeedFormat>,
    pub title: String,
    pub description: String,
    pub links: Vec<String>,
    pub categories: Vec<String>,
    pub copyright: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub authors: Vec<String>,
    pub items: Vec<Item>,
}

/// One entry of a channel.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Item {
    #[serde(skip)]
    pub(crate) channel: Option<ChannelId>,
    pub title: String,
    pub description: String,
    pub published: Option<DateTime<Utc>>,
    /// Last modification, distinct from `published`.
    pub updated: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    pub authors: Vec<String>,
    pub links: Vec<String>,
}

impl Channel {
    /// Creates an empty channel with no format tag.
    pub fn new() -> Self {
        Self {
            id: ChannelId::next(),
            format: None,
            title: String::new(),
            description: String::new(),
            links: Vec::new(),
            categories: Vec::new(),
            copyright: None,
            published: None,
            authors: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Assigns the format tag from its token, e.g. `"atom_1.0"`.
    ///
    /// # Errors
    ///
    /// [`FeedError::UnknownFormat`] when the token is not registered; the
    /// current tag is left unchanged.
    pub fn set_format_tag(&mut self, token: &str) -> Result<(), FeedError> {
        self.format = Some(token.parse()?);
        Ok(())
    }

    /// Sets the publication date, truncated to whole seconds.
    pub fn set_published(&mut self, published: Option<DateTime<Utc>>) {
        self.published = published.map(truncate);
    }

    /// Appends an item, binding it to this channel.
    pub fn add_item(&mut self, mut item: Item) {
        item.channel = Some(self.id);
        self.items.push(item);
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Channel {
    fn clone(&self) -> Self {
        let id = ChannelId::next();
        let items = self
            .items
            .iter()
            .map(|item| {
                let mut item = item.clone();
                if item.channel == Some(self.id) {
                    item.channel = Some(id);
                }
                item
            })
            .collect();
        Self {
            id,
            format: self.format,
            title: self.title.clone(),
            description: self.description.clone(),
            links: self.links.clone(),
            categories: self.categories.clone(),
            copyright: self.copyright.clone(),
            published: self.published,
            authors: self.authors.clone(),
            items,
        }
    }
}

impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format
            && self.title == other.title
            && self.description == other.description
            && self.links == other.links
            && self.categories == other.categories
            && self.copyright == other.copyright
            && self.published == other.published
            && self.authors == other.authors
            && self.items == other.items
    }
}

impl Item {
    /// Creates an empty item bound to `channel`. It still has to be appended
    /// with [`Channel::add_item`].
    pub fn for_channel(channel: &Channel) -> Self {
        Self {
            channel: Some(channel.id),
            ..Self::default()
        }
    }

    /// The channel this item was created for or appended to, if any.
    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    pub fn set_published(&mut self, published: Option<DateTime<Utc>>) {
        self.published = published.map(truncate);
    }

    pub fn set_updated(&mut self, updated: Option<DateTime<Utc>>) {
        self.updated = updated.map(truncate);
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.description == other.description
            && self.published == other.published
            && self.updated == other.updated
            && self.categories == other.categories
            && self.authors == other.authors
            && self.links == other.links
    }
}
