//! XML plumbing shared by the writers and parsers.
//!
//! Reading builds a small element tree from `quick-xml` events. Feeds are
//! shallow, so holding the whole document is cheaper to reason about than a
//! per-format streaming state machine. Writing wraps `quick_xml::Writer` with
//! the handful of shapes the feed grammars need.

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::FeedError;

/// SEC-003: Default nesting limit for feed documents.
/// Prevents stack and memory blowups from maliciously deep documents.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// An element with its attributes, concatenated text and child elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Element {
    /// Qualified name as written, e.g. `dc:creator`.
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first child called `name`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Text of a leaf element exactly as read. For an element with children,
    /// its own text and that of all descendants, trimmed and space separated.
    pub fn deep_text(&self) -> String {
        if self.children.is_empty() {
            return self.text.clone();
        }
        let mut parts = Vec::new();
        collect_text(self, &mut parts);
        parts.join(" ")
    }

    /// Non-empty texts of every child called `name`, in document order.
    pub fn child_texts(&self, name: &str) -> Vec<String> {
        self.children(name)
            .map(|c| c.text.clone())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn collect_text<'a>(element: &'a Element, parts: &mut Vec<&'a str>) {
    let text = element.text.trim();
    if !text.is_empty() {
        parts.push(text);
    }
    for child in &element.children {
        collect_text(child, parts);
    }
}

/// A parsed document: the DOCTYPE body, if any, and the root element.
#[derive(Debug)]
pub(crate) struct Document {
    pub doctype: Option<String>,
    pub root: Element,
}

/// Builds the element tree of `bytes`.
///
/// Text is kept exactly as written. Whitespace between the children of an
/// element still lands in that element's `text`; callers read `text` of leaf
/// elements only, or go through [`Element::deep_text`].
///
/// With `validate`, any well-formedness problem is a [`FeedError::Parse`]
/// carrying the byte offset. Without it, end-tag names are not checked and
/// the tree is cut at the first XML error, closing whatever is still open.
/// Exceeding `max_depth` is an error in both modes.
pub(crate) fn read_document(
    bytes: &[u8],
    validate: bool,
    max_depth: usize,
) -> Result<Document, FeedError> {
    // SEC-002: XXE protection: quick-xml (0.37) never parses <!ENTITY> declarations from
    // DOCTYPE. Only the 5 XML builtins and character references resolve; anything else
    // fails in `unescape()`, which is a parse error here (strict) or dropped text (lenient).
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().check_end_names = validate;

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut doctype = None;

    loop {
        let offset = reader.buffer_position() as u64;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                // SEC-003: Reject excessively nested documents
                if stack.len() >= max_depth {
                    return Err(FeedError::parse(
                        offset,
                        format!("nesting depth exceeds maximum of {} levels", max_depth),
                    ));
                }
                stack.push(element_from(&e, &reader, validate, offset)?);
            }
            Ok(Event::Empty(e)) => {
                let element = element_from(&e, &reader, validate, offset)?;
                attach(&mut stack, &mut root, element, validate, offset)?;
            }
            Ok(Event::End(_)) => match stack.pop() {
                Some(element) => attach(&mut stack, &mut root, element, validate, offset)?,
                None if validate => {
                    return Err(FeedError::parse(offset, "unexpected closing tag"));
                }
                None => {}
            },
            Ok(Event::Text(t)) => {
                if let Some(top) = stack.last_mut() {
                    match t.unescape() {
                        Ok(text) => top.text.push_str(&text),
                        Err(e) if validate => {
                            return Err(FeedError::parse(offset, e.to_string()));
                        }
                        Err(e) => {
                            tracing::warn!(offset, error = %e, "Dropping text with unresolvable entity");
                        }
                    }
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::DocType(d)) => {
                doctype = Some(String::from_utf8_lossy(&d).trim().to_string());
            }
            Ok(Event::Eof) => break,
            Err(e) if validate => {
                return Err(FeedError::parse(reader.buffer_position() as u64, e.to_string()));
            }
            Err(e) => {
                tracing::warn!(
                    offset = reader.buffer_position() as u64,
                    error = %e,
                    "Malformed XML, keeping the elements read so far"
                );
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        if validate {
            let open = stack.last().map(|e| e.name.clone()).unwrap_or_default();
            return Err(FeedError::parse(
                reader.buffer_position() as u64,
                format!("unexpected end of document, <{}> is not closed", open),
            ));
        }
        while let Some(element) = stack.pop() {
            attach(&mut stack, &mut root, element, false, 0)?;
        }
    }

    match root {
        Some(root) => Ok(Document { doctype, root }),
        None => Err(FeedError::parse(
            reader.buffer_position() as u64,
            "document has no root element",
        )),
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    validate: bool,
    offset: u64,
) -> Result<(), FeedError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else if validate {
        return Err(FeedError::parse(offset, "multiple root elements"));
    } else {
        tracing::warn!(name = %element.name, "Ignoring element after the root");
    }
    Ok(())
}

fn element_from(
    e: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
    validate: bool,
    offset: u64,
) -> Result<Element, FeedError> {
    let mut element = Element {
        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        ..Element::default()
    };

    let mut attributes = e.attributes();
    attributes.with_checks(validate);
    for attr_result in attributes {
        match attr_result.map_err(quick_xml::Error::from).and_then(|a| decode(a, reader)) {
            Ok(pair) => element.attributes.push(pair),
            Err(e) if validate => return Err(FeedError::parse(offset, e.to_string())),
            Err(e) => {
                tracing::warn!(element = %element.name, error = %e, "Skipping malformed attribute");
            }
        }
    }
    Ok(element)
}

fn decode(attr: Attribute<'_>, reader: &Reader<&[u8]>) -> Result<(String, String), quick_xml::Error> {
    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
    let value = attr.decode_and_unescape_value(reader.decoder())?.into_owned();
    Ok((key, value))
}

/// Root element name, its attributes and the DOCTYPE, read without building
/// the rest of the tree.
#[derive(Debug)]
pub(crate) struct RootInfo {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub doctype: Option<String>,
}

impl RootInfo {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Reads events up to the first element. `Ok(None)` when there is none.
pub(crate) fn read_root(bytes: &[u8]) -> Result<Option<RootInfo>, FeedError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut doctype = None;

    loop {
        let offset = reader.buffer_position() as u64;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let element = element_from(&e, &reader, false, offset)?;
                return Ok(Some(RootInfo {
                    name: element.name,
                    attributes: element.attributes,
                    doctype,
                }));
            }
            Ok(Event::DocType(d)) => {
                doctype = Some(String::from_utf8_lossy(&d).trim().to_string());
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => {
                return Err(FeedError::parse(reader.buffer_position() as u64, e.to_string()));
            }
            _ => {}
        }
        buf.clear();
    }
}

/// In-memory XML output. Text and attribute values are escaped by
/// `quick-xml`; documents are always UTF-8.
pub(crate) struct XmlSink {
    writer: Writer<Vec<u8>>,
}

impl XmlSink {
    /// `indent == 0` produces compact output.
    pub fn new(indent: usize) -> Self {
        let writer = if indent == 0 {
            Writer::new(Vec::new())
        } else {
            Writer::new_with_indent(Vec::new(), b' ', indent)
        };
        Self { writer }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), FeedError> {
        self.writer.write_event(event).map_err(FeedError::render)
    }

    pub fn declaration(&mut self) -> Result<(), FeedError> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    /// Writes `<!DOCTYPE {body}>`. `body` is emitted as given.
    pub fn doctype(&mut self, body: &str) -> Result<(), FeedError> {
        self.event(Event::DocType(BytesText::from_escaped(body)))
    }

    pub fn open(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), FeedError> {
        let mut start = BytesStart::new(name);
        for attribute in attributes {
            start.push_attribute(*attribute);
        }
        self.event(Event::Start(start))
    }

    pub fn close(&mut self, name: &str) -> Result<(), FeedError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    pub fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), FeedError> {
        let mut start = BytesStart::new(name);
        for attribute in attributes {
            start.push_attribute(*attribute);
        }
        self.event(Event::Empty(start))
    }

    /// Writes `<name>text</name>`.
    pub fn text(&mut self, name: &str, text: &str) -> Result<(), FeedError> {
        self.open(name, &[])?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    /// Writes `<name>text</name>` unless `text` is empty.
    pub fn text_if_present(&mut self, name: &str, text: &str) -> Result<(), FeedError> {
        if text.is_empty() {
            return Ok(());
        }
        self.text(name, text)
    }

    /// Writes one `<name>` element per value.
    pub fn texts(&mut self, name: &str, values: &[String]) -> Result<(), FeedError> {
        for value in values {
            self.text(name, value)?;
        }
        Ok(())
    }

    pub fn finish(self) -> Vec<u8> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        bytes
    }
}
