//! In-memory XML tree for the update manifest.
//!
//! `quick-xml` is event based, so the reader events are folded into a small
//! owned element tree that the rewrite rules can edit in place, and the tree
//! is written back out through the `quick-xml` writer with tab indentation.
//!
//! Only what the manifest needs is modelled: element names, ordered
//! attributes, text, and child elements. Comments, processing instructions,
//! and whitespace-only text are dropped while parsing.
//!
//! Output starts with an XML declaration and writes empty elements as
//! `<File .../>` without a space before the slash. Diffs against manifests
//! written without a declaration or as `<File ... />` differ on those lines
//! only.

use crate::error::{ManifestError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

/// An XML element with ordered attributes and child elements.
///
/// Attribute order follows the source document. Overwriting an existing
/// attribute keeps its position; new attributes are appended.
///
/// # Examples
///
/// ```
/// use pob_manifest_updater::document::Element;
///
/// let mut file = Element::new("File").with_attribute("name", "Launch.lua");
/// file.set_attribute("part", "default");
/// assert_eq!(file.attribute("part"), Some("default"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style variant of [`Self::set_attribute`].
    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Return the element's tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the element's text content, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Return the value of attribute `key`.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Return whether attribute `key` is present, whatever its value.
    #[must_use]
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.iter().any(|(k, _)| k == key)
    }

    /// Return all attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set attribute `key` to `value`, overwriting any existing value.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some((_, existing)) = self.attributes.iter_mut().find(|(k, _)| k == key) {
            *existing = value;
            return;
        }
        self.attributes.push((key.to_owned(), value));
    }

    /// Remove attribute `key`, returning its previous value.
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(index).1)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(ManifestError::parse)?
            .to_owned();
        let mut element = Self::new(name);
        for attribute in start.attributes() {
            let attribute = attribute.map_err(ManifestError::parse)?;
            let key = std::str::from_utf8(attribute.key.as_ref()).map_err(ManifestError::parse)?;
            let value = attribute.unescape_value().map_err(ManifestError::parse)?;
            element.set_attribute(key, value.into_owned());
        }
        Ok(element)
    }

    fn push_text(&mut self, text: &str) {
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_none() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        if let Some(text) = &self.text {
            write_event(writer, Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        write_event(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }
}

/// A parsed manifest document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    root: Element,
}

impl Manifest {
    /// Wrap `root` as a document.
    #[must_use]
    pub const fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parse UTF-8 encoded XML.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] when the bytes are not UTF-8, the XML
    /// is malformed, or the document does not have exactly one root element.
    ///
    /// # Examples
    ///
    /// ```
    /// use pob_manifest_updater::document::Manifest;
    ///
    /// let manifest = Manifest::parse(b"<PoBVersion><Version number=\"2.0\"/></PoBVersion>")?;
    /// assert_eq!(manifest.root().children.len(), 1);
    /// # Ok::<(), pob_manifest_updater::error::ManifestError>(())
    /// ```
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(bytes).map_err(ManifestError::parse)?;
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut open: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(ManifestError::parse)? {
                Event::Start(start) => open.push(Element::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Element::from_start(&start)?;
                    attach(element, &mut open, &mut root)?;
                }
                Event::End(_) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| ManifestError::parse("unexpected closing tag"))?;
                    attach(element, &mut open, &mut root)?;
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(ManifestError::parse)?;
                    push_text(&text, &mut open)?;
                }
                Event::CData(data) => {
                    let text = String::from_utf8(data.into_inner().into_owned())
                        .map_err(ManifestError::parse)?;
                    push_text(&text, &mut open)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(ManifestError::parse(format!(
                "unclosed element <{}>",
                unclosed.name()
            )));
        }
        root.map(Self::new)
            .ok_or_else(|| ManifestError::parse("document has no root element"))
    }

    /// Return the root element.
    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }

    /// Return the root element for editing.
    pub const fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Serialize to tab-indented UTF-8 XML with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Serialize`] if the writer rejects an event.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
        write_event(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        self.root.write_to(&mut writer)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|e| ManifestError::Serialize {
            reason: e.to_string(),
        })
    }
}

fn attach(element: Element, open: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ManifestError::parse(format!(
            "unexpected second root element <{}>",
            element.name()
        )));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(text: &str, open: &mut [Element]) -> Result<()> {
    let element = open
        .last_mut()
        .ok_or_else(|| ManifestError::parse("text outside the root element"))?;
    element.push_text(text);
    Ok(())
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ManifestError::Serialize {
            reason: e.to_string(),
        })
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
