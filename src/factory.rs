//! Construction of channels, items, writers and parsers.

use crate::error::FeedError;
use crate::format::namespace::{ATOM03, ATOM10, RSS090};
use crate::format::FeedFormat;
use crate::model::{Channel, Item};
use crate::parser::FeedParser;
use crate::writer::{FeedWriter, DEFAULT_INDENT};
use crate::xml::{read_root, RootInfo, DEFAULT_MAX_DEPTH};

/// Hands out writers and parsers for the registered formats.
///
/// The factory holds only options, so it is `Copy` and can be shared freely
/// between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatFactory {
    default_format: Option<FeedFormat>,
    indent: usize,
    max_depth: usize,
}

impl Default for FormatFactory {
    fn default() -> Self {
        Self {
            default_format: None,
            indent: DEFAULT_INDENT,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl FormatFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose new channels are tagged with `format`.
    pub fn bound(format: FeedFormat) -> Self {
        Self::new().with_default_format(Some(format))
    }

    pub fn with_default_format(mut self, format: Option<FeedFormat>) -> Self {
        self.default_format = format;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn default_format(&self) -> Option<FeedFormat> {
        self.default_format
    }

    /// An empty channel tagged with the bound format, if any.
    pub fn create_channel(&self) -> Channel {
        let mut channel = Channel::new();
        channel.format = self.default_format;
        channel
    }

    /// An empty item bound to `channel`. Append it with [`Channel::add_item`].
    pub fn create_item(&self, channel: &Channel) -> Item {
        Item::for_channel(channel)
    }

    /// Writer for a format token such as `"rss_2.0"`.
    ///
    /// # Errors
    ///
    /// [`FeedError::UnknownFormat`] when the token is not registered.
    pub fn writer_for(&self, token: &str) -> Result<FeedWriter, FeedError> {
        Ok(self.writer_for_format(token.parse()?))
    }

    pub fn writer_for_format(&self, format: FeedFormat) -> FeedWriter {
        FeedWriter::new(format).with_indent(self.indent)
    }

    pub fn parser_for_format(&self, format: FeedFormat) -> FeedParser {
        FeedParser::new(format).with_max_depth(self.max_depth)
    }

    /// Detects the format of `bytes` and returns the matching parser.
    ///
    /// # Errors
    ///
    /// - [`FeedError::UnsupportedFormat`] when the root element matches no
    ///   known grammar (or there is none).
    /// - [`FeedError::Parse`] when the prolog is not readable XML.
    pub fn parser_for(&self, bytes: &[u8]) -> Result<(FeedFormat, FeedParser), FeedError> {
        let format = sniff(bytes)?;
        tracing::debug!(format = %format, "Detected feed format");
        Ok((format, self.parser_for_format(format)))
    }
}

/// Detects a document's format from its root element, namespace, version
/// attribute and DOCTYPE.
pub fn sniff(bytes: &[u8]) -> Result<FeedFormat, FeedError> {
    let root = read_root(bytes)?
        .ok_or_else(|| FeedError::UnsupportedFormat("document has no root element".to_string()))?;
    match_root(&root).ok_or_else(|| FeedError::UnsupportedFormat(describe(&root)))
}

fn match_root(root: &RootInfo) -> Option<FeedFormat> {
    match root.name.as_str() {
        "rss" => match root.attr("version")?.trim() {
            "0.91" if is_netscape(root) => Some(FeedFormat::Rss091Netscape),
            "0.91" => Some(FeedFormat::Rss091Userland),
            "0.92" => Some(FeedFormat::Rss092),
            "0.93" => Some(FeedFormat::Rss093),
            "0.94" => Some(FeedFormat::Rss094),
            "2.0" => Some(FeedFormat::Rss20),
            _ => None,
        },
        // Any RDF root is RSS 1.0 unless it declares the 0.90 namespace.
        "rdf:RDF" => match root.attr("xmlns") {
            Some(RSS090) => Some(FeedFormat::Rss090),
            _ => Some(FeedFormat::Rss10),
        },
        "feed" => match (root.attr("xmlns"), root.attr("version")) {
            (Some(ATOM10), _) => Some(FeedFormat::Atom10),
            (Some(ATOM03), _) | (_, Some("0.3")) => Some(FeedFormat::Atom03),
            _ => None,
        },
        _ => None,
    }
}

fn is_netscape(root: &RootInfo) -> bool {
    root.doctype
        .as_deref()
        .is_some_and(|doctype| doctype.contains("Netscape"))
}

fn describe(root: &RootInfo) -> String {
    let mut description = format!("unrecognized root element <{}>", root.name);
    if let Some(version) = root.attr("version") {
        description.push_str(&format!(" version {:?}", version));
    }
    if let Some(namespace) = root.attr("xmlns") {
        description.push_str(&format!(" in namespace {}", namespace));
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_rss_versions() {
        for (version, expected) in [
            ("0.92", FeedFormat::Rss092),
            ("0.93", FeedFormat::Rss093),
            ("0.94", FeedFormat::Rss094),
            ("2.0", FeedFormat::Rss20),
            ("0.91", FeedFormat::Rss091Userland),
        ] {
            let doc = format!(r#"<?xml version="1.0"?><rss version="{}"><channel/></rss>"#, version);
            assert_eq!(sniff(doc.as_bytes()).unwrap(), expected, "{}", version);
        }
    }

    #[test]
    fn test_sniff_netscape_doctype() {
        let doc = r#"<?xml version="1.0"?>
<!DOCTYPE rss PUBLIC "-//Netscape Communications//DTD RSS 0.91//EN" "http://my.netscape.com/publish/formats/rss-0.91.dtd">
<rss version="0.91"><channel/></rss>"#;
        assert_eq!(sniff(doc.as_bytes()).unwrap(), FeedFormat::Rss091Netscape);
    }

    #[test]
    fn test_sniff_rdf_namespaces() {
        let rss10 = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns="http://purl.org/rss/1.0/"/>"#;
        let rss090 = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns="http://my.netscape.com/rdf/simple/0.9/"/>"#;
        assert_eq!(sniff(rss10.as_bytes()).unwrap(), FeedFormat::Rss10);
        assert_eq!(sniff(rss090.as_bytes()).unwrap(), FeedFormat::Rss090);
    }

    #[test]
    fn test_sniff_rdf_without_default_namespace_is_rss10() {
        let bare = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><channel/></rdf:RDF>"#;
        let other = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns="http://example.com/ns"/>"#;
        assert_eq!(sniff(bare.as_bytes()).unwrap(), FeedFormat::Rss10);
        assert_eq!(sniff(other.as_bytes()).unwrap(), FeedFormat::Rss10);
    }

    #[test]
    fn test_sniff_atom_versions() {
        let atom10 = r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#;
        let atom03 = r#"<feed version="0.3" xmlns="http://purl.org/atom/ns#"></feed>"#;
        let atom03_no_ns = r#"<feed version="0.3"></feed>"#;
        assert_eq!(sniff(atom10.as_bytes()).unwrap(), FeedFormat::Atom10);
        assert_eq!(sniff(atom03.as_bytes()).unwrap(), FeedFormat::Atom03);
        assert_eq!(sniff(atom03_no_ns.as_bytes()).unwrap(), FeedFormat::Atom03);
    }

    #[test]
    fn test_sniff_rejects_html() {
        let html = "<!DOCTYPE html><html><head><title>Page</title></head><body></body></html>";
        let err = sniff(html.as_bytes()).unwrap_err();
        match err {
            FeedError::UnsupportedFormat(msg) => assert!(msg.contains("<html>")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sniff_rejects_unknown_versions() {
        assert!(matches!(
            sniff(br#"<rss version="3.0"/>"#),
            Err(FeedError::UnsupportedFormat(_))
        ));
        assert!(matches!(sniff(b"<rss/>"), Err(FeedError::UnsupportedFormat(_))));
        assert!(matches!(sniff(b"<feed/>"), Err(FeedError::UnsupportedFormat(_))));
        assert!(matches!(sniff(b""), Err(FeedError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_writer_for_unknown_token() {
        let err = FormatFactory::new().writer_for("rss_9.9").unwrap_err();
        assert!(matches!(err, FeedError::UnknownFormat(ref t) if t == "rss_9.9"));
    }

    #[test]
    fn test_writer_for_known_token() {
        let writer = FormatFactory::new().writer_for("atom_0.3").unwrap();
        assert_eq!(writer.format(), FeedFormat::Atom03);
    }

    #[test]
    fn test_bound_factory_tags_channels() {
        let factory = FormatFactory::bound(FeedFormat::Rss10);
        let channel = factory.create_channel();
        assert_eq!(channel.format, Some(FeedFormat::Rss10));
        assert_eq!(FormatFactory::new().create_channel().format, None);

        let item = factory.create_item(&channel);
        assert_eq!(item.channel(), Some(channel.id()));
    }

    #[test]
    fn test_parser_for_returns_detected_format() {
        let (format, parser) = FormatFactory::new()
            .parser_for(br#"<feed xmlns="http://www.w3.org/2005/Atom"/>"#)
            .unwrap();
        assert_eq!(format, FeedFormat::Atom10);
        assert_eq!(parser.format(), FeedFormat::Atom10);
    }
}
