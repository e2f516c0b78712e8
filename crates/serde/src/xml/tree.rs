//! Generic element tree between the typed transformers and XML text.
//!
//! The serializer builds an [`XmlElement`] tree and renders it; the
//! deserializer parses text into one and reads the transformers from it.
//! Attributes are kept apart from child elements, so passes that rewrite
//! element names never see them. Every traversal here uses an explicit stack,
//! so arbitrarily deep documents do not exhaust the call stack.

use std::io::Write;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Result, SerdeError};
use crate::xml::utils;

/// One element: name, attributes, text and child elements.
///
/// AAS documents have no mixed content, so an element holds either text or
/// children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Leaf element carrying `text`.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.text = Some(text.into());
        element
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    pub fn push_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First child element named `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text content, empty when the element has none.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// This element and all of its descendants in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

impl Drop for XmlElement {
    fn drop(&mut self) {
        // Flatten the subtree so each element is dropped without children.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut element) = pending.pop() {
            pending.append(&mut element.children);
        }
    }
}

/// Pre-order iterator returned by [`XmlElement::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

enum RenderStep<'a> {
    Open(&'a XmlElement),
    Close(&'a str),
}

/// Writes `root` as a document: XML declaration, then the element tree
/// indented by `indent` spaces per level. Leaf text stays on the line of its
/// element.
pub fn render_document<W: Write>(root: &XmlElement, indent: usize, writer: W) -> Result<()> {
    let mut writer = if indent > 0 {
        Writer::new_with_indent(writer, b' ', indent)
    } else {
        Writer::new(writer)
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut stack = vec![RenderStep::Open(root)];
    while let Some(step) = stack.pop() {
        match step {
            RenderStep::Open(element) => {
                let mut start = BytesStart::new(element.name.as_str());
                for (key, value) in &element.attributes {
                    start.push_attribute((key.as_str(), value.as_str()));
                }

                if !element.children.is_empty() {
                    writer.write_event(Event::Start(start))?;
                    stack.push(RenderStep::Close(element.name.as_str()));
                    stack.extend(element.children.iter().rev().map(RenderStep::Open));
                    continue;
                }

                match element.text.as_deref() {
                    Some(text) if !text.is_empty() => {
                        writer.write_event(Event::Start(start))?;
                        writer.write_event(Event::Text(BytesText::new(text)))?;
                        writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
                    }
                    _ => writer.write_event(Event::Empty(start))?,
                }
            }
            RenderStep::Close(name) => {
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
        }
    }

    Ok(())
}

/// Parses a document into its root element.
///
/// Text made only of whitespace between child elements is dropped; text next
/// to child elements is a schema violation. Declarations, comments and
/// processing instructions are skipped. Element names are kept verbatim,
/// prefixes included.
pub fn parse_document(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut open: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let element = element_from_start(&start)?;
                if open.is_empty() && root.is_some() {
                    return Err(SerdeError::violation(
                        format!("/{}", element.name),
                        "document has more than one root element",
                    ));
                }
                open.push(element);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut open, &mut root, element)?;
            }
            Event::End(_) => {
                let mut element = open.pop().ok_or_else(|| {
                    SerdeError::violation("/", "closing tag without matching opening tag")
                })?;
                if !element.children.is_empty() {
                    if element.text.as_deref().is_some_and(|t| !utils::is_blank(t)) {
                        open.push(element);
                        return Err(SerdeError::violation(
                            open_path(&open),
                            "text is not allowed next to child elements",
                        ));
                    }
                    element.text = None;
                }
                attach(&mut open, &mut root, element)?;
            }
            Event::Text(text) => {
                let raw = String::from_utf8_lossy(text.as_ref());
                append_text(&mut open, &unescape(&raw)?)?;
            }
            Event::CData(data) => {
                append_text(&mut open, &String::from_utf8_lossy(data.as_ref()))?;
            }
            Event::GeneralRef(reference) => {
                let entity = format!("&{};", String::from_utf8_lossy(reference.as_ref()));
                append_text(&mut open, &unescape(&entity)?)?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
        }
    }

    if !open.is_empty() {
        return Err(SerdeError::violation(
            open_path(&open),
            "document ended before the element was closed",
        ));
    }
    root.ok_or_else(|| SerdeError::violation("/", "document has no root element"))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw)?.to_string();
        element.push_attribute(key, value);
    }
    Ok(element)
}

fn attach(
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match open.last_mut() {
        Some(parent) => parent.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(SerdeError::violation(
                format!("/{}", element.name),
                "document has more than one root element",
            ));
        }
    }
    Ok(())
}

fn append_text(open: &mut [XmlElement], text: &str) -> Result<()> {
    match open.last_mut() {
        Some(element) => {
            element.text.get_or_insert_with(String::new).push_str(text);
            Ok(())
        }
        None if utils::is_blank(text) => Ok(()),
        None => Err(SerdeError::violation("/", "text outside of the root element")),
    }
}

fn open_path(open: &[XmlElement]) -> String {
    let mut path = String::new();
    for element in open {
        path.push('/');
        path.push_str(&element.name);
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(root: &XmlElement) -> String {
        let mut buffer = Vec::new();
        render_document(root, 2, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_render_leaf_text_inline() {
        let mut root = XmlElement::new("root");
        root.push(XmlElement::with_text("id", "urn:a"));
        let xml = render(&root);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("\n  <id>urn:a</id>"));
        assert!(xml.ends_with("</root>"));
    }

    #[test]
    fn test_render_escapes_text_and_attributes() {
        let mut root = XmlElement::with_text("value", "a < b & c");
        root.push_attribute("note", "\"quoted\"");
        let xml = render(&root);
        assert!(xml.contains("a &lt; b &amp; c"));
        assert!(xml.contains("note=\"&quot;quoted&quot;\""));
    }

    #[test]
    fn test_render_empty_leaf() {
        let root = XmlElement::new("capability");
        assert!(render(&root).contains("<capability/>"));
    }

    #[test]
    fn test_parse_roundtrip() {
        let mut root = XmlElement::new("a:root");
        root.push_attribute("xmlns:a", "urn:ns");
        let mut child = XmlElement::new("a:list");
        child.push(XmlElement::with_text("a:item", "  spaced & escaped  "));
        child.push(XmlElement::with_text("a:item", "second"));
        root.push(child);

        let parsed = parse_document(&render(&root)).unwrap();
        assert_eq!(parsed, root);
    }

    #[test]
    fn test_parse_resolves_references() {
        let parsed = parse_document("<v>&lt;&#65;&#x42;&gt;<![CDATA[&raw]]></v>").unwrap();
        assert_eq!(parsed.text(), "<AB>&raw");
    }

    #[test]
    fn test_parse_rejects_mixed_content() {
        let err = parse_document("<root>text<child/></root>").unwrap_err();
        match err {
            SerdeError::SchemaViolation { path, .. } => assert_eq!(path, "/root"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_rejects_second_root() {
        assert!(parse_document("<a/><b/>").is_err());
    }

    #[test]
    fn test_parse_rejects_unclosed_document() {
        assert!(parse_document("<a><b></b>").is_err());
    }

    #[test]
    fn test_deep_nesting_uses_no_recursion() {
        let depth = 50_000;
        let xml = format!("{}{}", "<n>".repeat(depth), "</n>".repeat(depth));
        let parsed = parse_document(&xml).unwrap();
        assert_eq!(parsed.descendants().count(), depth);

        let mut buffer = Vec::new();
        render_document(&parsed, 0, &mut buffer).unwrap();
        assert!(buffer.len() > xml.len());
    }

    #[test]
    fn test_descendants_order() {
        let mut root = XmlElement::new("r");
        let mut a = XmlElement::new("a");
        a.push(XmlElement::new("a1"));
        root.push(a);
        root.push(XmlElement::new("b"));
        let names: Vec<&str> = root.descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["r", "a", "a1", "b"]);
    }
}
