use thiserror::Error;

/// Errors raised by the feed engine.
///
/// `Validation` is caller-fixable (supply the missing field).
/// `UnknownFormat` and `UnsupportedFormat` are configuration errors.
/// I/O failures carry the underlying `std::io::Error` untouched.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A format token that is not one of the registered identifiers.
    #[error("unknown feed format: {0:?}")]
    UnknownFormat(String),

    /// Sniffing found a root element that matches no known grammar.
    #[error("unsupported document: {0}")]
    UnsupportedFormat(String),

    /// A required field is missing on write, or a required element is
    /// missing on a validated read.
    #[error("invalid feed: {field} {reason}")]
    Validation { field: String, reason: String },

    /// The document is not well-formed XML.
    #[error("XML parse error at byte {offset}: {message}")]
    Parse { offset: u64, message: String },

    /// The destination failed while the document was being written.
    #[error("failed to write feed: {0}")]
    Write(#[source] std::io::Error),

    /// The source failed while the document was being read.
    #[error("failed to read feed: {0}")]
    Read(#[source] std::io::Error),

    /// The source is larger than the configured limit.
    #[error("feed document exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

impl FeedError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        FeedError::Validation {
            field: field.into(),
            reason: "is required".to_string(),
        }
    }

    pub(crate) fn parse(offset: u64, message: impl Into<String>) -> Self {
        FeedError::Parse {
            offset,
            message: message.into(),
        }
    }

    /// Wraps a failure of the in-memory XML writer.
    pub(crate) fn render<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        FeedError::Write(std::io::Error::other(err))
    }
}
