//! Format-agnostic syndication feeds.
//!
//! A [`Channel`] with its [`Item`]s is the single in-memory model for ten RSS
//! and Atom grammars. A [`FeedWriter`] renders a channel in one grammar, a
//! [`FeedParser`] reads one back, and [`FormatFactory`] picks the right one
//! for a format token or an unknown document. What each grammar can carry is
//! described once, in the [`capability`] table.
//!
//! ```no_run
//! use feedforge::{FeedFormat, FeedManager, FormatFactory};
//!
//! let factory = FormatFactory::bound(FeedFormat::Rss20);
//! let mut channel = factory.create_channel();
//! channel.title = "Example".into();
//! channel.description = "An example feed".into();
//! channel.links.push("http://example.com/".into());
//!
//! let manager = FeedManager::with_factory(factory);
//! manager.write_feed(std::io::stdout(), &channel)?;
//! # Ok::<(), feedforge::FeedError>(())
//! ```

pub mod config;
pub mod date;
pub mod error;
pub mod factory;
pub mod format;
pub mod manager;
pub mod model;
pub mod parser;
pub mod writer;

mod xml;

pub use config::{ConfigError, EngineConfig};
pub use error::FeedError;
pub use factory::{sniff, FormatFactory};
pub use format::capability::{self, max_cardinality, project, supports, Cardinality, Field};
pub use format::FeedFormat;
pub use manager::FeedManager;
pub use model::{Channel, ChannelId, Item};
pub use parser::FeedParser;
pub use writer::FeedWriter;
