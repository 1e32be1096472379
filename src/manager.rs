//! Entry point tying the factory, writers and parsers together.

use std::io::{Read, Write};
use std::path::Path;

use crate::config::EngineConfig;
use crate::error::FeedError;
use crate::factory::FormatFactory;
use crate::model::Channel;
use crate::writer::FeedWriter;

/// Default cap on the size of a document read by [`FeedManager`] (10 MiB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Writes channels according to their format tag and reads documents of any
/// supported format.
///
/// Every call is synchronous and does no retrying; failures surface as soon
/// as they happen.
#[derive(Debug, Clone, Copy)]
pub struct FeedManager {
    factory: FormatFactory,
    max_document_bytes: u64,
}

impl Default for FeedManager {
    fn default() -> Self {
        Self {
            factory: FormatFactory::default(),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

impl FeedManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factory(factory: FormatFactory) -> Self {
        Self {
            factory,
            ..Self::default()
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let factory = FormatFactory::new()
            .with_default_format(config.default_format)
            .with_indent(config.indent)
            .with_max_depth(config.max_depth);
        Self {
            factory,
            max_document_bytes: config.max_document_bytes,
        }
    }

    pub fn factory(&self) -> &FormatFactory {
        &self.factory
    }

    /// Writes `channel` in the format named by its tag.
    ///
    /// # Errors
    ///
    /// - [`FeedError::UnknownFormat`] when the tag was never set.
    /// - [`FeedError::Validation`] when a required field is missing.
    /// - [`FeedError::Write`] when the destination fails.
    pub fn write_feed<W: Write>(&self, destination: W, channel: &Channel) -> Result<(), FeedError> {
        self.writer_for(channel)?.write(destination, channel)
    }

    /// Detects the format of `source` and parses it.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Read`] when the source fails.
    /// - [`FeedError::TooLarge`] beyond the configured size limit.
    /// - [`FeedError::UnsupportedFormat`] when the document is not a known feed.
    /// - [`FeedError::Parse`] / [`FeedError::Validation`] as for
    ///   [`FeedParser::parse`](crate::FeedParser::parse).
    pub fn read_feed<R: Read>(&self, source: R, validate: bool) -> Result<Channel, FeedError> {
        let bytes = self.read_bounded(source)?;
        let (_, parser) = self.factory.parser_for(&bytes)?;
        parser.parse(&bytes, validate)
    }

    /// Writes `channel` to `path` atomically.
    ///
    /// The document is rendered first, so validation failures leave the
    /// filesystem untouched. The bytes then go to a temporary file in the same
    /// directory, are synced to disk, and the file is renamed over `path`.
    pub fn write_feed_to_path(&self, path: &Path, channel: &Channel) -> Result<(), FeedError> {
        let bytes = self.writer_for(channel)?.render(channel)?;
        atomic_write(path, &bytes)?;
        tracing::info!(path = %path.display(), format = ?channel.format, "Saved feed");
        Ok(())
    }

    pub fn read_feed_from_path(&self, path: &Path, validate: bool) -> Result<Channel, FeedError> {
        let file = std::fs::File::open(path).map_err(FeedError::Read)?;
        self.read_feed(file, validate)
    }

    fn writer_for(&self, channel: &Channel) -> Result<FeedWriter, FeedError> {
        let format = channel.format.ok_or_else(|| {
            FeedError::UnknownFormat("channel has no format tag".to_string())
        })?;
        Ok(self.factory.writer_for_format(format))
    }

    fn read_bounded<R: Read>(&self, source: R) -> Result<Vec<u8>, FeedError> {
        let limit = self.max_document_bytes;
        let mut bytes = Vec::new();
        source
            .take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(FeedError::Read)?;
        if bytes.len() as u64 > limit {
            return Err(FeedError::TooLarge { limit });
        }
        Ok(bytes)
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), FeedError> {
    use std::time::{SystemTime, UNIX_EPOCH};

    // SEC-009: Randomized temp filename to prevent TOCTOU race conditions
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(FeedError::Write)?;

    if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(FeedError::Write(e));
    }
    drop(file);

    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        FeedError::Write(e)
    })
}
