//! Owned, library-independent XML tree.
//!
//! The parser works on [`XmlNode`] instead of `roxmltree::Node` so that the
//! segmentation logic can be driven from any source of tagged text, including
//! trees built by hand in tests.

use std::collections::BTreeMap;

use roxmltree::{Document, Node, ParsingOptions};
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;

/// A child of an element: either a nested element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlContent {
    Element(XmlNode),
    Text(String),
}

/// An element with its tag, attributes and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Tag name without namespace prefix.
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<XmlContent>,
}

impl XmlNode {
    /// Create an element without attributes or children.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(XmlContent::Element(child));
        self
    }

    /// Append a text run.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlContent::Text(text.into()));
        self
    }

    /// Get an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Iterate over element children, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &XmlNode> {
        self.children.iter().filter_map(|c| match c {
            XmlContent::Element(e) => Some(e),
            XmlContent::Text(_) => None,
        })
    }

    /// Concatenate the text runs directly inside this element.
    pub fn own_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlContent::Text(t) => Some(t.as_str()),
                XmlContent::Element(_) => None,
            })
            .collect()
    }

    /// Concatenate all text in this subtree in document order.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlContent::Text(t) => out.push_str(t),
                XmlContent::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Build an owned tree from a `roxmltree` element.
    ///
    /// Text is composed to Unicode NFC so that character counts match the
    /// rendered width of Italian text. Comments and processing instructions
    /// are dropped.
    pub fn from_roxmltree(node: Node<'_, '_>) -> Self {
        let mut element = Self::new(node.tag_name().name());

        for attr in node.attributes() {
            element
                .attributes
                .insert(attr.name().to_string(), attr.value().to_string());
        }

        for child in node.children() {
            if child.is_element() {
                element
                    .children
                    .push(XmlContent::Element(Self::from_roxmltree(child)));
            } else if child.is_text() {
                if let Some(text) = child.text() {
                    element
                        .children
                        .push(XmlContent::Text(text.nfc().collect()));
                }
            }
        }

        element
    }
}

/// Parse an XML document into an owned tree rooted at its root element.
///
/// DTDs are allowed since Normattiva exports may carry a document type
/// declaration.
pub fn parse_document(xml: &str) -> Result<XmlNode> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)?;
    Ok(XmlNode::from_roxmltree(doc.root_element()))
}
