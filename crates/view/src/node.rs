//! Arena node storage types
//!
//! A node is a parent back-reference plus one of three closed payloads.
//! The parent is a plain index: it never owns anything, and it is cleared
//! as soon as the node leaves its container.

use crate::element::Element;
use crate::types::NodeId;
use smallvec::SmallVec;

/// Child id list. Most view nodes have fewer than four children.
pub type Children = SmallVec<[NodeId; 4]>;

#[derive(Debug, Clone)]
pub struct ViewNode {
    pub(crate) parent: Option<NodeId>,
    pub(crate) data: NodeData,
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Text(Text),
    Element(Element),
    DocumentFragment(DocumentFragment),
}

impl ViewNode {
    pub(crate) fn new(data: NodeData) -> Self {
        Self { parent: None, data }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    pub fn is_document_fragment(&self) -> bool {
        matches!(self.data, NodeData::DocumentFragment(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn as_element_mut(&mut self) -> Option<&mut Element> {
        match &mut self.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(text) => Some(&text.data),
            _ => None,
        }
    }

    /// Children of elements and fragments, empty for text.
    pub fn children(&self) -> &[NodeId] {
        match &self.data {
            NodeData::Text(_) => &[],
            NodeData::Element(element) => &element.children,
            NodeData::DocumentFragment(fragment) => &fragment.children,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Children> {
        match &mut self.data {
            NodeData::Text(_) => None,
            NodeData::Element(element) => Some(&mut element.children),
            NodeData::DocumentFragment(fragment) => Some(&mut fragment.children),
        }
    }

    /// Node type name for diagnostics.
    pub fn type_name(&self) -> &str {
        match &self.data {
            NodeData::Text(_) => "text",
            NodeData::Element(element) => element.kind().as_str(),
            NodeData::DocumentFragment(_) => "documentFragment",
        }
    }
}

/// Text node.
#[derive(Debug, Clone)]
pub struct Text {
    pub(crate) data: String,
}

impl Text {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

/// Parentless container, the boundary of ancestor searches.
#[derive(Debug, Clone, Default)]
pub struct DocumentFragment {
    pub(crate) children: Children,
}

/// A character range of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextProxy {
    pub text: NodeId,
    /// Offset in characters.
    pub offset: usize,
    /// Length in characters.
    pub length: usize,
}

impl TextProxy {
    pub fn new(text: NodeId, offset: usize, length: usize) -> Self {
        Self {
            text,
            offset,
            length,
        }
    }

    /// The proxied slice of `data`.
    pub fn slice(&self, data: &str) -> String {
        data.chars().skip(self.offset).take(self.length).collect()
    }
}

/// Item accepted by child insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildInput {
    /// Becomes a new text node.
    Text(String),
    /// Becomes a new, detached text node holding the proxied characters.
    TextProxy(TextProxy),
    /// Existing node, detached from its current parent first.
    Node(NodeId),
}

impl From<&str> for ChildInput {
    fn from(text: &str) -> Self {
        ChildInput::Text(text.to_string())
    }
}

impl From<String> for ChildInput {
    fn from(text: String) -> Self {
        ChildInput::Text(text)
    }
}

impl From<NodeId> for ChildInput {
    fn from(node: NodeId) -> Self {
        ChildInput::Node(node)
    }
}

impl From<TextProxy> for ChildInput {
    fn from(proxy: TextProxy) -> Self {
        ChildInput::TextProxy(proxy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_proxy_slices_characters() {
        let proxy = TextProxy::new(0, 1, 3);
        assert_eq!(proxy.slice("żółwik"), "ółw");
        assert_eq!(TextProxy::new(0, 4, 10).slice("abcdef"), "ef");
    }

    #[test]
    fn test_text_node_has_no_children() {
        let node = ViewNode::new(NodeData::Text(Text::new("foo")));
        assert!(node.children().is_empty());
        assert_eq!(node.as_text(), Some("foo"));
        assert_eq!(node.type_name(), "text");
        assert_eq!(node.parent(), None);
    }
}
