//! Core type definitions shared by the whole view layer
//!
//! Key design principles:
//! 1. Use u32 for indices, never pointers or shared ownership
//! 2. Closed enums for node kinds, so every `match` is exhaustive
//! 3. Keep names aligned with what the editing view calls them

use serde::{Deserialize, Serialize};

/// Node identifier (index into the arena)
pub type NodeId = u32;

/// Default priority of attribute elements.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Attributes stored as a token set regardless of element name.
pub const TOKEN_LIST_ATTRIBUTES: &[&str] = &["class"];

/// Attributes stored as a style map regardless of element name.
pub const STYLES_MAP_ATTRIBUTES: &[&str] = &["style"];

/// `(element name, attribute key)` pairs that are token sets only on that element.
pub const ELEMENT_TOKEN_LIST_ATTRIBUTES: &[(&str, &str)] = &[("a", "rel")];

/// Flavour of a view element.
///
/// The kind decides what an element may contain and how it behaves in
/// filler placement and attribute-element merging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    /// Block-like structure (`p`, `li`, `figure`, ...).
    Container,
    /// Inline formatting wrapper (`b`, `a`, `span`, ...).
    Attribute { priority: i32, id: Option<String> },
    /// Element that never has children (`img`, `br`).
    Empty,
    /// Editing UI, never part of the data.
    Ui,
    /// Element whose inner content is opaque to the editor.
    Raw,
    /// Editable region.
    Editable,
}

impl ElementKind {
    /// Attribute element with default priority and no id.
    pub fn attribute() -> Self {
        ElementKind::Attribute {
            priority: DEFAULT_PRIORITY,
            id: None,
        }
    }

    /// Whether elements of this kind may hold children.
    pub fn accepts_children(&self) -> bool {
        !matches!(self, ElementKind::Empty | ElementKind::Ui | ElementKind::Raw)
    }

    /// Short lowercase name, used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Container => "containerElement",
            ElementKind::Attribute { .. } => "attributeElement",
            ElementKind::Empty => "emptyElement",
            ElementKind::Ui => "uiElement",
            ElementKind::Raw => "rawElement",
            ElementKind::Editable => "editableElement",
        }
    }

    /// Parse the name produced by [`ElementKind::as_str`] or its short form.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "container" | "containerElement" => Some(ElementKind::Container),
            "attribute" | "attributeElement" => Some(ElementKind::attribute()),
            "empty" | "emptyElement" => Some(ElementKind::Empty),
            "ui" | "uiElement" => Some(ElementKind::Ui),
            "raw" | "rawElement" => Some(ElementKind::Raw),
            "editable" | "editableElement" => Some(ElementKind::Editable),
            _ => None,
        }
    }
}

/// Kind of a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    Attributes,
    Children,
}

/// A `(key, token)` consumable or match unit.
///
/// `token` is `None` for plain attributes, and a class name or style name
/// for structured ones.
pub type AttributeMatch = (String, Option<String>);

/// Whether `key` on an element named `element_name` is stored as a token set.
pub fn uses_token_list(element_name: &str, key: &str) -> bool {
    TOKEN_LIST_ATTRIBUTES.contains(&key)
        || ELEMENT_TOKEN_LIST_ATTRIBUTES
            .iter()
            .any(|(name, attr)| *name == element_name && *attr == key)
}

/// Whether `key` is stored as a style map.
pub fn uses_styles_map(key: &str) -> bool {
    STYLES_MAP_ATTRIBUTES.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_is_token_list_only_on_anchors() {
        assert!(uses_token_list("a", "rel"));
        assert!(!uses_token_list("link", "rel"));
        assert!(uses_token_list("span", "class"));
        assert!(uses_styles_map("style"));
        assert!(!uses_styles_map("class"));
    }

    #[test]
    fn test_element_kind_names() {
        assert_eq!(ElementKind::from_name("ui"), Some(ElementKind::Ui));
        assert_eq!(
            ElementKind::from_name(ElementKind::attribute().as_str()),
            Some(ElementKind::attribute())
        );
        assert!(!ElementKind::Empty.accepts_children());
        assert!(ElementKind::Editable.accepts_children());
    }
}
