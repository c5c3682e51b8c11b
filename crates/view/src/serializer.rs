//! View serializer - render a view subtree as a data string
//!
//! This module handles:
//! - attribute output in `attribute_keys` order
//! - filtering of script-like attributes
//! - void elements and UI elements
//! - escaping of text and attribute values

use crate::document::ViewDocument;
use crate::element::Element;
use crate::error::Result;
use crate::node::NodeData;
use crate::types::{ElementKind, NodeId};
use crate::utils::{escape_attribute, escape_text};

/// HTML void elements, rendered without a closing tag.
pub const DEFAULT_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Attributes whose value may carry a `javascript:` URL.
const URL_ATTRIBUTES: &[&str] = &["href", "src"];

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    pub render_ui_elements: bool,
    pub filter_unsafe_attributes: bool,
    pub void_elements: Vec<String>,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            render_ui_elements: false,
            filter_unsafe_attributes: true,
            void_elements: DEFAULT_VOID_ELEMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// View tree serializer
pub struct ViewSerializer {
    config: SerializerConfig,
}

impl ViewSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Serialize a node and its subtree.
    pub fn serialize(&self, document: &ViewDocument, node_id: NodeId) -> Result<String> {
        let mut output = String::with_capacity(256);
        self.serialize_node(document, node_id, &mut output)?;
        Ok(output)
    }

    /// Serialize only the children of a node.
    pub fn serialize_children(&self, document: &ViewDocument, node_id: NodeId) -> Result<String> {
        let mut output = String::with_capacity(256);
        for &child_id in document.children(node_id)? {
            self.serialize_node(document, child_id, &mut output)?;
        }
        Ok(output)
    }

    fn serialize_node(&self, document: &ViewDocument, node_id: NodeId, output: &mut String) -> Result<()> {
        let node = document.get(node_id)?;

        match node.data() {
            NodeData::Text(text) => output.push_str(&escape_text(text.data())),
            NodeData::DocumentFragment(fragment) => {
                for &child_id in &fragment.children {
                    self.serialize_node(document, child_id, output)?;
                }
            }
            NodeData::Element(element) => {
                if *element.kind() == ElementKind::Ui && !self.config.render_ui_elements {
                    return Ok(());
                }

                output.push('<');
                output.push_str(element.name());
                for (key, value) in element.attributes() {
                    if self.is_filtered(element, key, &value) {
                        tracing::debug!("Filtered unsafe attribute {} on <{}>", key, element.name());
                        continue;
                    }
                    output.push_str(&format!(" {}=\"{}\"", key, escape_attribute(&value)));
                }
                output.push('>');

                if self.is_void(element) {
                    return Ok(());
                }

                for &child_id in element.children() {
                    self.serialize_node(document, child_id, output)?;
                }

                output.push_str("</");
                output.push_str(element.name());
                output.push('>');
            }
        }

        Ok(())
    }

    /// Void elements have no closing tag. Other childless elements,
    /// empty ones included, still get one.
    fn is_void(&self, element: &Element) -> bool {
        element.is_empty() && self.config.void_elements.iter().any(|name| name == element.name())
    }

    /// Event handler attributes and `javascript:` URLs, unless allowed on the element.
    fn is_filtered(&self, element: &Element, key: &str, value: &str) -> bool {
        if !self.config.filter_unsafe_attributes || element.should_render_unsafe_attribute(key) {
            return false;
        }

        let lowercase_key = key.to_ascii_lowercase();
        if lowercase_key.starts_with("on") {
            return true;
        }

        URL_ATTRIBUTES.contains(&lowercase_key.as_str())
            && value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("javascript:")
    }
}

impl Default for ViewSerializer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::{DowncastWriter, ElementOptions, NO_ATTRIBUTES};

    #[test]
    fn test_serialize_simple_tree() {
        let mut doc = ViewDocument::new();
        let mut writer = DowncastWriter::new(&mut doc);
        let p = writer.create_container_element(
            "p",
            [("data-x", "1 < 2"), ("style", "color:red"), ("class", "b a")],
        );
        let br = writer.create_empty_element("br", NO_ATTRIBUTES, ElementOptions::default()).unwrap();
        writer.append(p, vec!["foo & bar".into(), br.into()]).unwrap();

        let html = ViewSerializer::new().serialize(&doc, p).unwrap();
        assert_eq!(
            html,
            "<p class=\"b a\" style=\"color:red;\" data-x=\"1 &lt; 2\">foo &amp; bar<br></p>"
        );
    }

    #[test]
    fn test_unsafe_attributes_filtered() {
        let mut doc = ViewDocument::new();
        let mut writer = DowncastWriter::new(&mut doc);
        let a = writer
            .create_attribute_element(
                "a",
                [("href", "javascript:alert(1)"), ("onclick", "x()"), ("title", "t")],
                ElementOptions::default(),
            )
            .unwrap();
        let allowed = writer
            .create_attribute_element(
                "a",
                [("onclick", "x()")],
                ElementOptions {
                    render_unsafe_attributes: vec!["onclick".to_string()],
                    ..Default::default()
                },
            )
            .unwrap();

        let serializer = ViewSerializer::new();
        assert_eq!(serializer.serialize(&doc, a).unwrap(), "<a title=\"t\"></a>");
        assert_eq!(
            serializer.serialize(&doc, allowed).unwrap(),
            "<a onclick=\"x()\"></a>"
        );
    }

    #[test]
    fn test_ui_elements_skipped_by_default() {
        let mut doc = ViewDocument::new();
        let mut writer = DowncastWriter::new(&mut doc);
        let ui = writer.create_ui_element("span", [("class", "marker")]);
        let div = writer.create_container_element("div", NO_ATTRIBUTES);
        writer.append(div, vec![ui.into()]).unwrap();

        assert_eq!(ViewSerializer::new().serialize(&doc, div).unwrap(), "<div></div>");

        let config = SerializerConfig {
            render_ui_elements: true,
            ..Default::default()
        };
        assert_eq!(
            ViewSerializer::with_config(config).serialize(&doc, div).unwrap(),
            "<div><span class=\"marker\"></span></div>"
        );
    }
}
