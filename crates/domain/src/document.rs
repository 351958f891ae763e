//! Parsed response documents
//!
//! Cloud Director answers with XML for `application/*+xml` requests and with
//! JSON when the caller overrides the accept header. Both are parsed into a
//! [`Document`] so the task lifecycle can be inspected regardless of format.

use std::str;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A navigable XML element.
///
/// Names are stored without namespace prefixes, which is how Cloud Director
/// documents are addressed in practice (`Task`, `VersionInfo`, `Error`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlElement {
    /// Local element name.
    pub name: String,
    /// Attributes in document order, keyed by local name.
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
    /// Concatenated text content directly under this element.
    #[serde(default)]
    pub text: String,
    /// Child elements in document order.
    #[serde(default)]
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an empty element with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an attribute, builder style.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Adds a child element, builder style.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the text content, builder style.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Returns the value of the named attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first direct child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns all direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the text of the named child, trimmed.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }

    /// Depth-first search for the first descendant (excluding `self`)
    /// matching the predicate.
    pub fn find_descendant<P>(&self, predicate: P) -> Option<&Self>
    where
        P: Fn(&Self) -> bool + Copy,
    {
        for child in &self.children {
            if predicate(child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(predicate) {
                return Some(found);
            }
        }
        None
    }

    /// Parses an XML string into its root element.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDocument`] on malformed XML or when the
    /// input has no root element.
    pub fn parse(xml: &str) -> DomainResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Self> = Vec::new();
        let mut root: Option<Self> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(element_from_start(e)?),
                Ok(Event::Empty(ref e)) => {
                    let element = element_from_start(e)?;
                    attach(&mut stack, &mut root, element);
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| DomainError::InvalidDocument(format!("bad text: {err}")))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    let bytes = e.into_inner();
                    let text = str::from_utf8(&bytes)
                        .map_err(|_| DomainError::InvalidDocument("invalid UTF-8 in CDATA".into()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(DomainError::InvalidDocument(format!(
                        "XML error at position {}: {e}",
                        reader.buffer_position()
                    )));
                }
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(DomainError::InvalidDocument("unclosed element".to_string()));
        }
        root.ok_or_else(|| DomainError::InvalidDocument("no root element".to_string()))
    }
}

fn element_from_start(start: &BytesStart<'_>) -> DomainResult<XmlElement> {
    let name = str::from_utf8(start.local_name().as_ref())
        .map_err(|_| DomainError::InvalidDocument("invalid UTF-8 in tag name".into()))?
        .to_string();

    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DomainError::InvalidDocument(format!("bad attribute: {e}")))?;
        let full_key = attr.key.as_ref();
        if full_key == b"xmlns" || full_key.starts_with(b"xmlns:") {
            continue;
        }
        let key = str::from_utf8(attr.key.local_name().as_ref())
            .map_err(|_| DomainError::InvalidDocument("invalid UTF-8 in attribute name".into()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| DomainError::InvalidDocument(format!("bad attribute value: {e}")))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}

/// A parsed response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Document {
    /// An XML document, represented by its root element.
    Xml(XmlElement),
    /// A JSON document.
    Json(serde_json::Value),
    /// A body that is neither XML nor JSON.
    Text(String),
    /// A zero-length body.
    Empty,
}

impl Document {
    /// Parses a response body, choosing the format from its content type.
    ///
    /// XML is used when the content type mentions `xml`, JSON when it mentions
    /// `json`. A body without a usable content type is tried as XML when it
    /// starts with `<` and as JSON when it starts with `{` or `[`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDocument`] when the body does not match
    /// the declared or detected format.
    pub fn parse(content_type: Option<&str>, body: &str) -> DomainResult<Self> {
        let trimmed = body.trim_start();
        if trimmed.is_empty() {
            return Ok(Self::Empty);
        }

        let content_type = content_type.map(str::to_ascii_lowercase).unwrap_or_default();
        if content_type.contains("xml") {
            return XmlElement::parse(body).map(Self::Xml);
        }
        if content_type.contains("json") {
            return Self::parse_json(body);
        }

        if trimmed.starts_with('<') {
            XmlElement::parse(body).map(Self::Xml)
        } else if trimmed.starts_with('{') || trimmed.starts_with('[') {
            Self::parse_json(body)
        } else {
            Ok(Self::Text(body.to_string()))
        }
    }

    fn parse_json(body: &str) -> DomainResult<Self> {
        serde_json::from_str(body)
            .map(Self::Json)
            .map_err(|e| DomainError::InvalidDocument(format!("invalid JSON: {e}")))
    }

    /// Returns the XML root element, if this is an XML document.
    #[must_use]
    pub const fn as_xml(&self) -> Option<&XmlElement> {
        match self {
            Self::Xml(root) => Some(root),
            _ => None,
        }
    }

    /// Returns the JSON value, if this is a JSON document.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Extracts the message from a Cloud Director error body.
    ///
    /// XML errors look like `<Error message=".." majorErrorCode="403"
    /// minorErrorCode=".."/>`; JSON errors carry the same fields as keys.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Xml(root) if root.name == "Error" => {
                let message = root.attribute("message")?;
                Some(match root.attribute("minorErrorCode") {
                    Some(minor) if !minor.is_empty() => format!("{message} ({minor})"),
                    _ => message.to_string(),
                })
            }
            Self::Json(value) => {
                let message = value.get("message")?.as_str()?;
                Some(match value.get("minorErrorCode").and_then(|v| v.as_str()) {
                    Some(minor) if !minor.is_empty() => format!("{message} ({minor})"),
                    _ => message.to_string(),
                })
            }
            _ => None,
        }
    }
}
