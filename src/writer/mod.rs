//! Serialization of a [`Channel`] into a concrete wire format.
//!
//! A [`FeedWriter`] is bound to one [`FeedFormat`]. Writing happens in three
//! steps:
//!
//! 1. required fields are validated, before any byte reaches the destination;
//! 2. the channel is projected onto the format's capabilities, which drops
//!    unsupported fields and clamps single-valued ones to their first value;
//! 3. the family renderer ([`rss`], [`rdf`] or [`atom`]) emits every field the
//!    projection kept.

mod atom;
mod rdf;
mod rss;

use std::io::Write;

use crate::error::FeedError;
use crate::format::capability::project;
use crate::format::{Family, FeedFormat};
use crate::model::Channel;
use crate::xml::XmlSink;

/// Default indentation of generated documents, in spaces.
pub const DEFAULT_INDENT: usize = 2;

/// Renders channels as one format's XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedWriter {
    format: FeedFormat,
    indent: usize,
}

impl FeedWriter {
    pub fn new(format: FeedFormat) -> Self {
        Self {
            format,
            indent: DEFAULT_INDENT,
        }
    }

    /// Sets the indentation width; `0` writes compact output.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn format(&self) -> FeedFormat {
        self.format
    }

    /// Writes `channel` to `destination` as this writer's format.
    ///
    /// The channel's own format tag is not consulted; callers that want
    /// tag-driven dispatch go through [`FeedManager`](crate::FeedManager).
    ///
    /// # Errors
    ///
    /// - [`FeedError::Validation`] when a required field is missing. Nothing
    ///   is written in that case.
    /// - [`FeedError::Write`] when the destination fails.
    pub fn write<W: Write>(&self, mut destination: W, channel: &Channel) -> Result<(), FeedError> {
        let bytes = self.render(channel)?;
        destination.write_all(&bytes).map_err(FeedError::Write)?;
        destination.flush().map_err(FeedError::Write)?;
        tracing::debug!(
            format = %self.format,
            items = channel.items.len(),
            bytes = bytes.len(),
            "Wrote feed"
        );
        Ok(())
    }

    /// Renders `channel` into a complete UTF-8 document.
    pub fn render(&self, channel: &Channel) -> Result<Vec<u8>, FeedError> {
        validate(channel, self.format)?;
        let projected = project(channel, self.format);

        let mut sink = XmlSink::new(self.indent);
        sink.declaration()?;
        match self.format.family() {
            Family::Rss => rss::render(&mut sink, &projected, self.format)?,
            Family::Rdf => rdf::render(&mut sink, &projected, self.format)?,
            Family::Atom => atom::render(&mut sink, &projected, self.format)?,
        }
        Ok(sink.finish())
    }

    /// Renders `channel` into a `String`.
    pub fn render_string(&self, channel: &Channel) -> Result<String, FeedError> {
        let bytes = self.render(channel)?;
        // XmlSink only ever receives &str content.
        String::from_utf8(bytes).map_err(FeedError::render)
    }
}

fn validate(channel: &Channel, format: FeedFormat) -> Result<(), FeedError> {
    if channel.title.trim().is_empty() {
        return Err(FeedError::missing("title"));
    }
    if channel.description.trim().is_empty() {
        return Err(FeedError::missing("description"));
    }
    if format.is_legacy() {
        if channel.items.is_empty() {
            return Err(FeedError::Validation {
                field: "items".to_string(),
                reason: format!("must contain at least one item for {}", format),
            });
        }
    } else if channel.links.iter().all(|link| link.is_empty()) {
        return Err(FeedError::Validation {
            field: "links".to_string(),
            reason: format!("must contain at least one link for {}", format),
        });
    }

    for (index, item) in channel.items.iter().enumerate() {
        if let Some(owner) = item.channel() {
            if owner != channel.id() {
                return Err(FeedError::Validation {
                    field: format!("items[{}]", index),
                    reason: "belongs to a different channel".to_string(),
                });
            }
        }
    }
    Ok(())
}
