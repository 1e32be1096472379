//! Deserialization of feed documents into a [`Channel`].
//!
//! Each family parser ([`rss`], [`rdf`], [`atom`]) maps the elements it knows
//! and ignores everything else, so extension elements never cause errors.
//! The result is then projected onto the format's capabilities: fields the
//! format cannot carry read back empty, and single-valued fields keep their
//! first occurrence.

mod atom;
mod rdf;
mod rss;

use url::Url;

use crate::error::FeedError;
use crate::format::capability::project;
use crate::format::{Family, FeedFormat};
use crate::model::Channel;
use crate::xml::{read_document, Element, DEFAULT_MAX_DEPTH};

/// Reads documents of one format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedParser {
    format: FeedFormat,
    max_depth: usize,
}

impl FeedParser {
    pub fn new(format: FeedFormat) -> Self {
        Self {
            format,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the element nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn format(&self) -> FeedFormat {
        self.format
    }

    /// Parses `source` as this parser's format.
    ///
    /// With `validate`, the document must be well-formed XML and RSS/RDF
    /// documents must have a `<channel>`; links that are not absolute URLs
    /// are logged. Without it, the parser keeps whatever it could read.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Parse`] for malformed XML (validated reads) or for
    ///   documents nested deeper than the configured limit.
    /// - [`FeedError::UnsupportedFormat`] when the root element belongs to
    ///   another format family.
    /// - [`FeedError::Validation`] when a validated read misses `<channel>`.
    pub fn parse(&self, source: &[u8], validate: bool) -> Result<Channel, FeedError> {
        let document = read_document(source, validate, self.max_depth)?;
        let family = self.format.family();
        let expected = root_element(family);
        if document.root.name != expected {
            return Err(FeedError::UnsupportedFormat(format!(
                "expected <{}> for {}, found <{}>",
                expected, self.format, document.root.name
            )));
        }

        let mut channel = match family {
            Family::Rss => rss::parse(&document.root, validate)?,
            Family::Rdf => rdf::parse(&document.root, validate)?,
            Family::Atom => atom::parse(&document.root),
        };
        channel.format = Some(self.format);
        if validate {
            check_links(&channel);
        }

        tracing::debug!(
            format = %self.format,
            items = channel.items.len(),
            "Parsed feed"
        );
        Ok(project(&channel, self.format))
    }
}

fn root_element(family: Family) -> &'static str {
    match family {
        Family::Rss => "rss",
        Family::Rdf => "rdf:RDF",
        Family::Atom => "feed",
    }
}

/// `<channel>` of an RSS or RDF document, enforced only on validated reads.
fn channel_element(root: &Element, validate: bool) -> Result<Option<&Element>, FeedError> {
    match root.child("channel") {
        Some(channel) => Ok(Some(channel)),
        None if validate => Err(FeedError::missing("channel")),
        None => {
            tracing::warn!(root = %root.name, "Document has no <channel>, returning an empty feed");
            Ok(None)
        }
    }
}

fn text(element: &Element, name: &str) -> String {
    element.child_text(name).unwrap_or_default().to_string()
}

fn optional_text(element: &Element, name: &str) -> Option<String> {
    element
        .child_text(name)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Logs links that are not absolute URLs. They are kept as written.
fn check_links(channel: &Channel) {
    let links = channel
        .links
        .iter()
        .chain(channel.items.iter().flat_map(|item| item.links.iter()));
    for link in links {
        if let Err(e) = Url::parse(link) {
            tracing::warn!(link = %link, error = %e, "Feed contains a link that is not an absolute URL");
        }
    }
}
