//! Writers - the only way to build and mutate a view tree
//!
//! [`DowncastWriter`] serves the editing/data output path and can create
//! every element kind. [`UpcastWriter`] serves parsed input and only
//! creates plain container elements.
//!
//! Both borrow the document mutably for their lifetime, so a tree has a
//! single writer at a time.

use crate::attribute::AttributeInput;
use crate::document::ViewDocument;
use crate::element::{FillerOffsetFn, PropertyKey};
use crate::error::Result;
use crate::node::ChildInput;
use crate::types::{ElementKind, NodeId, DEFAULT_PRIORITY};
use std::any::Any;
use std::rc::Rc;

/// Attribute list for elements created without attributes.
pub const NO_ATTRIBUTES: [(&str, &str); 0] = [];

/// Extra options for attribute elements and unsafe attribute rendering.
#[derive(Debug, Clone, Default)]
pub struct ElementOptions {
    pub priority: Option<i32>,
    pub id: Option<String>,
    /// Attribute names rendered even when they look unsafe.
    pub render_unsafe_attributes: Vec<String>,
}

pub struct DowncastWriter<'a> {
    document: &'a mut ViewDocument,
}

impl<'a> DowncastWriter<'a> {
    pub fn new(document: &'a mut ViewDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &ViewDocument {
        self.document
    }

    fn create<I, K, V>(
        &mut self,
        name: &str,
        kind: ElementKind,
        attributes: I,
        unsafe_attributes: Vec<String>,
    ) -> Result<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeInput>,
    {
        let node_id = self.document.create_element(name, kind, attributes);
        if !unsafe_attributes.is_empty() {
            self.document.set_unsafe_attributes(node_id, unsafe_attributes)?;
        }
        Ok(node_id)
    }

    pub fn create_container_element<I, K, V>(&mut self, name: &str, attributes: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeInput>,
    {
        self.document
            .create_element(name, ElementKind::Container, attributes)
    }

    /// Container element created together with its children.
    pub fn create_container_element_with<I, K, V>(
        &mut self,
        name: &str,
        attributes: I,
        children: Vec<ChildInput>,
    ) -> Result<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeInput>,
    {
        let node_id = self.create_container_element(name, attributes);
        self.document.append_children(node_id, children)?;
        Ok(node_id)
    }

    pub fn create_attribute_element<I, K, V>(
        &mut self,
        name: &str,
        attributes: I,
        options: ElementOptions,
    ) -> Result<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeInput>,
    {
        let kind = ElementKind::Attribute {
            priority: options.priority.unwrap_or(DEFAULT_PRIORITY),
            id: options.id,
        };
        self.create(name, kind, attributes, options.render_unsafe_attributes)
    }

    pub fn create_empty_element<I, K, V>(
        &mut self,
        name: &str,
        attributes: I,
        options: ElementOptions,
    ) -> Result<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeInput>,
    {
        self.create(name, ElementKind::Empty, attributes, options.render_unsafe_attributes)
    }

    pub fn create_ui_element<I, K, V>(&mut self, name: &str, attributes: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeInput>,
    {
        self.document.create_element(name, ElementKind::Ui, attributes)
    }

    pub fn create_raw_element<I, K, V>(
        &mut self,
        name: &str,
        attributes: I,
        options: ElementOptions,
    ) -> Result<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeInput>,
    {
        self.create(name, ElementKind::Raw, attributes, options.render_unsafe_attributes)
    }

    pub fn create_editable_element<I, K, V>(
        &mut self,
        name: &str,
        attributes: I,
        options: ElementOptions,
    ) -> Result<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeInput>,
    {
        self.create(name, ElementKind::Editable, attributes, options.render_unsafe_attributes)
    }

    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.document.create_text(data)
    }

    pub fn create_document_fragment(&mut self, children: Vec<ChildInput>) -> Result<NodeId> {
        let fragment = self.document.create_document_fragment();
        self.document.append_children(fragment, children)?;
        Ok(fragment)
    }

    /// Set an attribute, replacing structured values wholesale.
    pub fn set_attribute(
        &mut self,
        node_id: NodeId,
        key: &str,
        value: impl Into<AttributeInput>,
    ) -> Result<()> {
        self.document.set_attribute(node_id, key, value.into(), true)
    }

    /// Set an attribute, merging into an existing structured value.
    pub fn merge_attribute(
        &mut self,
        node_id: NodeId,
        key: &str,
        value: impl Into<AttributeInput>,
    ) -> Result<()> {
        self.document.set_attribute(node_id, key, value.into(), false)
    }

    pub fn remove_attribute(&mut self, node_id: NodeId, key: &str) -> Result<bool> {
        self.document.remove_attribute(node_id, key, None)
    }

    /// Remove tokens (or style names) from a structured attribute. The key
    /// goes away once nothing is left in it.
    pub fn remove_attribute_tokens(&mut self, node_id: NodeId, key: &str, tokens: &[&str]) -> Result<bool> {
        let tokens: Vec<String> = tokens.iter().map(|token| token.to_string()).collect();
        self.document.remove_attribute(node_id, key, Some(&tokens))
    }

    pub fn add_class(&mut self, node_id: NodeId, names: impl Into<AttributeInput>) -> Result<()> {
        self.document.set_attribute(node_id, "class", names.into(), false)
    }

    pub fn remove_class(&mut self, node_id: NodeId, names: &[&str]) -> Result<bool> {
        let tokens: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        self.document.remove_attribute(node_id, "class", Some(&tokens))
    }

    pub fn set_style(&mut self, node_id: NodeId, property: &str, value: &str) -> Result<()> {
        self.document
            .set_attribute(node_id, "style", AttributeInput::style(property, value), false)
    }

    /// Set several style properties at once.
    pub fn set_styles(&mut self, node_id: NodeId, styles: &[(&str, &str)]) -> Result<()> {
        self.document
            .set_attribute(node_id, "style", styles.to_vec().into(), false)
    }

    pub fn remove_style(&mut self, node_id: NodeId, properties: &[&str]) -> Result<bool> {
        let names: Vec<String> = properties.iter().map(|name| name.to_string()).collect();
        self.document.remove_attribute(node_id, "style", Some(&names))
    }

    pub fn set_custom_property(
        &mut self,
        node_id: NodeId,
        key: impl Into<PropertyKey>,
        value: impl Any,
    ) -> Result<()> {
        self.document
            .set_custom_property(node_id, key.into(), Rc::new(value))
    }

    pub fn remove_custom_property(&mut self, node_id: NodeId, key: impl Into<PropertyKey>) -> Result<bool> {
        self.document.remove_custom_property(node_id, &key.into())
    }

    /// Replace the element's filler offset logic, `None` restores the default.
    pub fn set_filler_offset(
        &mut self,
        node_id: NodeId,
        filler_offset: Option<FillerOffsetFn>,
    ) -> Result<()> {
        self.document.set_filler_offset(node_id, filler_offset)
    }

    pub fn insert(&mut self, parent: NodeId, index: usize, items: Vec<ChildInput>) -> Result<usize> {
        self.document.insert_children(parent, index, items)
    }

    pub fn append(&mut self, parent: NodeId, items: Vec<ChildInput>) -> Result<usize> {
        self.document.append_children(parent, items)
    }

    /// Detach a node from its parent. Returns whether it had one.
    pub fn remove(&mut self, node_id: NodeId) -> Result<bool> {
        remove_from_parent(self.document, node_id)
    }

    pub fn remove_children(&mut self, parent: NodeId, index: usize, count: usize) -> Result<Vec<NodeId>> {
        self.document.remove_children(parent, index, count)
    }

    /// Free a detached node and everything below it. Returns the number of
    /// freed nodes.
    pub fn release(&mut self, node_id: NodeId) -> Result<usize> {
        self.document.release(node_id)
    }

    pub fn clone_element(&mut self, node_id: NodeId, deep: bool) -> Result<NodeId> {
        self.document.clone_node(node_id, deep)
    }

    /// Merge `source`'s attributes into `target` (wrapping with a similar
    /// attribute element). Returns whether the merge was applied.
    pub fn merge_attributes(&mut self, target: NodeId, source: NodeId) -> Result<bool> {
        self.document.merge_attributes_from(target, source)
    }

    /// Remove `source`'s attributes from `target` (unwrapping).
    pub fn subtract_attributes(&mut self, target: NodeId, source: NodeId) -> Result<bool> {
        self.document.subtract_attributes_of(target, source)
    }
}

pub struct UpcastWriter<'a> {
    document: &'a mut ViewDocument,
}

impl<'a> UpcastWriter<'a> {
    pub fn new(document: &'a mut ViewDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &ViewDocument {
        self.document
    }

    pub fn create_element<I, K, V>(
        &mut self,
        name: &str,
        attributes: I,
        children: Vec<ChildInput>,
    ) -> Result<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeInput>,
    {
        let node_id = self
            .document
            .create_element(name, ElementKind::Container, attributes);
        self.document.append_children(node_id, children)?;
        Ok(node_id)
    }

    /// Element of an explicit kind, used by description parsers.
    pub fn create_element_of_kind<I, K, V>(
        &mut self,
        name: &str,
        kind: ElementKind,
        attributes: I,
        children: Vec<ChildInput>,
    ) -> Result<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeInput>,
    {
        let node_id = self.document.create_element(name, kind, attributes);
        if !children.is_empty() {
            self.document.append_children(node_id, children)?;
        }
        Ok(node_id)
    }

    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.document.create_text(data)
    }

    pub fn create_document_fragment(&mut self, children: Vec<ChildInput>) -> Result<NodeId> {
        let fragment = self.document.create_document_fragment();
        self.document.append_children(fragment, children)?;
        Ok(fragment)
    }

    pub fn append_child(&mut self, parent: NodeId, items: Vec<ChildInput>) -> Result<usize> {
        self.document.append_children(parent, items)
    }

    pub fn insert_child(&mut self, parent: NodeId, index: usize, items: Vec<ChildInput>) -> Result<usize> {
        self.document.insert_children(parent, index, items)
    }

    pub fn remove(&mut self, node_id: NodeId) -> Result<bool> {
        remove_from_parent(self.document, node_id)
    }

    pub fn release(&mut self, node_id: NodeId) -> Result<usize> {
        self.document.release(node_id)
    }

    pub fn set_attribute(
        &mut self,
        node_id: NodeId,
        key: &str,
        value: impl Into<AttributeInput>,
    ) -> Result<()> {
        self.document.set_attribute(node_id, key, value.into(), true)
    }

    pub fn remove_attribute(&mut self, node_id: NodeId, key: &str) -> Result<bool> {
        self.document.remove_attribute(node_id, key, None)
    }

    /// Remove tokens (or style names) from a structured attribute. The key
    /// goes away once nothing is left in it.
    pub fn remove_attribute_tokens(&mut self, node_id: NodeId, key: &str, tokens: &[&str]) -> Result<bool> {
        let tokens: Vec<String> = tokens.iter().map(|token| token.to_string()).collect();
        self.document.remove_attribute(node_id, key, Some(&tokens))
    }

    pub fn add_class(&mut self, node_id: NodeId, names: impl Into<AttributeInput>) -> Result<()> {
        self.document.set_attribute(node_id, "class", names.into(), false)
    }

    pub fn remove_class(&mut self, node_id: NodeId, names: &[&str]) -> Result<bool> {
        let tokens: Vec<String> = names.iter().map(|name| name.to_string()).collect();
        self.document.remove_attribute(node_id, "class", Some(&tokens))
    }

    pub fn set_style(&mut self, node_id: NodeId, property: &str, value: &str) -> Result<()> {
        self.document
            .set_attribute(node_id, "style", AttributeInput::style(property, value), false)
    }

    pub fn remove_style(&mut self, node_id: NodeId, properties: &[&str]) -> Result<bool> {
        let names: Vec<String> = properties.iter().map(|name| name.to_string()).collect();
        self.document.remove_attribute(node_id, "style", Some(&names))
    }

    pub fn set_custom_property(
        &mut self,
        node_id: NodeId,
        key: impl Into<PropertyKey>,
        value: impl Any,
    ) -> Result<()> {
        self.document
            .set_custom_property(node_id, key.into(), Rc::new(value))
    }

    pub fn clone_element(&mut self, node_id: NodeId, deep: bool) -> Result<NodeId> {
        self.document.clone_node(node_id, deep)
    }
}

fn remove_from_parent(document: &mut ViewDocument, node_id: NodeId) -> Result<bool> {
    let Some(parent) = document.parent(node_id)? else {
        return Ok(false);
    };
    let Some(index) = document.child_index(node_id)? else {
        return Ok(false);
    };
    document.remove_children(parent, index, 1)?;
    Ok(true)
}
