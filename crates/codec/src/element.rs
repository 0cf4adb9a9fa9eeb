//! Minimal owned XML tree.
//!
//! Fishbowl documents are small and shallow, so the codec parses them into a
//! plain tree and walks it, instead of streaming.

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use fishbowl_core::{Fields, StatusCode};

use crate::error::CodecError;

const STATUS_CODE: &str = "statusCode";
const STATUS_MESSAGE: &str = "statusMessage";

/// An XML element with its attributes, text content, and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.push((name.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Element whose children are one leaf per field.
    pub fn from_fields(name: impl Into<String>, fields: &Fields) -> Self {
        let mut element = Self::new(name);
        element.children = fields
            .iter()
            .map(|(k, v)| Element::new(k).with_text(v))
            .collect();
        element
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First element named `name` in document order, including `self`.
    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Every element named `name` in document order, including `self`.
    pub fn find_all<'a>(&'a self, name: &'a str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        self.collect_named(name, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        if self.name == name {
            out.push(self);
        }
        for child in &self.children {
            child.collect_named(name, out);
        }
    }

    /// Leaf children as an ordered field list.
    pub fn fields(&self) -> Fields {
        self.children
            .iter()
            .filter(|c| c.children.is_empty())
            .map(|c| (c.name.clone(), c.text.clone()))
            .collect()
    }

    /// Parsed `statusCode` attribute, if present.
    ///
    /// Documents produced by [`Element::parse`] have already had their status
    /// attributes validated, so a malformed value only shows up here for
    /// hand-built trees; it is treated as absent.
    pub fn status(&self) -> Option<StatusCode> {
        self.attr(STATUS_CODE).and_then(|s| s.parse().ok())
    }

    pub fn status_message(&self) -> Option<&str> {
        self.attr(STATUS_MESSAGE)
    }

    /// Parse a complete document and return its root element.
    ///
    /// Surrounding whitespace in text nodes is trimmed; comments, processing
    /// instructions, and the XML declaration are ignored.
    pub fn parse(text: &str) -> Result<Element, CodecError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(CodecError::malformed)? {
                Event::Start(start) => stack.push(open(&start)?),
                Event::Empty(start) => {
                    let element = open(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| CodecError::Malformed("unbalanced end tag".into()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(CodecError::malformed)?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    let data = data.into_inner();
                    let data = core::str::from_utf8(&data).map_err(CodecError::malformed)?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(data);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(CodecError::Malformed("unexpected end of document".into()));
        }
        root.ok_or_else(|| CodecError::Malformed("empty document".into()))
    }

    /// Serialize to a compact XML string (no declaration, no indentation).
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    fn write_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attributes {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&escape(v.as_str()));
            out.push('"');
        }
        if self.text.is_empty() && self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        out.push_str(&escape(self.text.as_str()));
        for child in &self.children {
            child.write_xml(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

fn open(start: &BytesStart<'_>) -> Result<Element, CodecError> {
    let name = core::str::from_utf8(start.name().as_ref())
        .map_err(CodecError::malformed)?
        .to_string();
    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(CodecError::malformed)?;
        let key = core::str::from_utf8(attr.key.as_ref())
            .map_err(CodecError::malformed)?
            .to_string();
        let value = attr.unescape_value().map_err(CodecError::malformed)?;
        if key == STATUS_CODE {
            value
                .parse::<StatusCode>()
                .map_err(|_| CodecError::InvalidStatus(value.to_string()))?;
        }
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), CodecError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(CodecError::Malformed("multiple root elements".into())),
    }
    Ok(())
}
