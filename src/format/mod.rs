//! Format identifiers and the dispatch registry.
//!
//! Every supported wire grammar is a variant of the closed [`FeedFormat`]
//! enum. Two static tables describe the differences between them:
//!
//! - the registry in this module maps a format to its token and to the
//!   writer/parser family that renders it;
//! - [`capability`] maps a format to the fields it can carry.
//!
//! Writers and parsers consult these tables instead of branching on
//! individual versions.

pub mod capability;

/// XML namespaces of the supported grammars.
pub(crate) mod namespace {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RSS090: &str = "http://my.netscape.com/rdf/simple/0.9/";
    pub const RSS10: &str = "http://purl.org/rss/1.0/";
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    pub const ATOM03: &str = "http://purl.org/atom/ns#";
    pub const ATOM10: &str = "http://www.w3.org/2005/Atom";
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FeedError;

/// A concrete RSS or Atom wire grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedFormat {
    #[serde(rename = "rss_0.9")]
    Rss090,
    #[serde(rename = "rss_0.91N")]
    Rss091Netscape,
    #[serde(rename = "rss_0.91U")]
    Rss091Userland,
    #[serde(rename = "rss_0.92")]
    Rss092,
    #[serde(rename = "rss_0.93")]
    Rss093,
    #[serde(rename = "rss_0.94")]
    Rss094,
    #[serde(rename = "rss_1.0")]
    Rss10,
    #[serde(rename = "rss_2.0")]
    Rss20,
    #[serde(rename = "atom_0.3")]
    Atom03,
    #[serde(rename = "atom_1.0")]
    Atom10,
}

/// Writer/parser strategy shared by several formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Family {
    /// `<rss version="…"><channel>` with nested items.
    Rss,
    /// `<rdf:RDF>` with items as siblings of the channel.
    Rdf,
    /// `<feed>` with flat entries.
    Atom,
}

struct FormatEntry {
    format: FeedFormat,
    token: &'static str,
    family: Family,
    /// Value written to the root `version` attribute, when the grammar has one.
    version: Option<&'static str>,
}

const REGISTRY: [FormatEntry; 10] = [
    FormatEntry {
        format: FeedFormat::Rss090,
        token: "rss_0.9",
        family: Family::Rdf,
        version: None,
    },
    FormatEntry {
        format: FeedFormat::Rss091Netscape,
        token: "rss_0.91N",
        family: Family::Rss,
        version: Some("0.91"),
    },
    FormatEntry {
        format: FeedFormat::Rss091Userland,
        token: "rss_0.91U",
        family: Family::Rss,
        version: Some("0.91"),
    },
    FormatEntry {
        format: FeedFormat::Rss092,
        token: "rss_0.92",
        family: Family::Rss,
        version: Some("0.92"),
    },
    FormatEntry {
        format: FeedFormat::Rss093,
        token: "rss_0.93",
        family: Family::Rss,
        version: Some("0.93"),
    },
    FormatEntry {
        format: FeedFormat::Rss094,
        token: "rss_0.94",
        family: Family::Rss,
        version: Some("0.94"),
    },
    FormatEntry {
        format: FeedFormat::Rss10,
        token: "rss_1.0",
        family: Family::Rdf,
        version: None,
    },
    FormatEntry {
        format: FeedFormat::Rss20,
        token: "rss_2.0",
        family: Family::Rss,
        version: Some("2.0"),
    },
    FormatEntry {
        format: FeedFormat::Atom03,
        token: "atom_0.3",
        family: Family::Atom,
        version: Some("0.3"),
    },
    FormatEntry {
        format: FeedFormat::Atom10,
        token: "atom_1.0",
        family: Family::Atom,
        version: None,
    },
];

impl FeedFormat {
    /// All formats in registry order.
    pub const ALL: [FeedFormat; 10] = [
        FeedFormat::Rss090,
        FeedFormat::Rss091Netscape,
        FeedFormat::Rss091Userland,
        FeedFormat::Rss092,
        FeedFormat::Rss093,
        FeedFormat::Rss094,
        FeedFormat::Rss10,
        FeedFormat::Rss20,
        FeedFormat::Atom03,
        FeedFormat::Atom10,
    ];

    fn entry(self) -> &'static FormatEntry {
        // The registry holds exactly one entry per variant, in declaration order.
        &REGISTRY[self as usize]
    }

    /// The identifier used as the channel's format tag, e.g. `rss_2.0`.
    pub fn token(self) -> &'static str {
        self.entry().token
    }

    pub(crate) fn family(self) -> Family {
        self.entry().family
    }

    pub(crate) fn version_attribute(self) -> Option<&'static str> {
        self.entry().version
    }

    /// RSS 0.90 and both 0.91 variants.
    ///
    /// These need at least one item to be well-formed, and do not insist on a
    /// channel link at write time.
    pub fn is_legacy(self) -> bool {
        matches!(
            self,
            FeedFormat::Rss090 | FeedFormat::Rss091Netscape | FeedFormat::Rss091Userland
        )
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for FeedFormat {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        REGISTRY
            .iter()
            .find(|entry| entry.token == s)
            .map(|entry| entry.format)
            .ok_or_else(|| FeedError::UnknownFormat(s.to_string()))
    }
}
