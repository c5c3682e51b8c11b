//! View document - owner of the view tree
//!
//! This handles:
//! - node storage (through [`ViewArena`])
//! - the styles processor handed to every element
//! - change notification, fired before every mutation
//! - tree navigation and ancestor search
//!
//! Mutations are crate-private: outside code goes through a writer
//! ([`crate::DowncastWriter`], [`crate::UpcastWriter`]).

use crate::arena::ViewArena;
use crate::attribute::AttributeInput;
use crate::change::ChangeListener;
use crate::element::{Element, FillerOffsetFn, PropertyKey};
use crate::error::{Result, ViewError};
use crate::matcher::{Matcher, Pattern};
use crate::node::{ChildInput, DocumentFragment, NodeData, Text, ViewNode};
use crate::styles::StylesProcessor;
use crate::types::{ChangeKind, ElementKind, NodeId};
use ahash::AHashSet;
use std::any::Any;
use std::rc::Rc;

pub struct ViewDocument {
    arena: ViewArena,
    styles_processor: Rc<StylesProcessor>,
    listeners: Vec<Box<dyn ChangeListener>>,
}

impl ViewDocument {
    /// Document with the default style shorthand rules.
    pub fn new() -> Self {
        Self::with_styles_processor(StylesProcessor::with_default_rules())
    }

    pub fn with_styles_processor(styles_processor: StylesProcessor) -> Self {
        Self {
            arena: ViewArena::new(),
            styles_processor: Rc::new(styles_processor),
            listeners: Vec::new(),
        }
    }

    pub fn arena(&self) -> &ViewArena {
        &self.arena
    }

    pub fn styles_processor(&self) -> &Rc<StylesProcessor> {
        &self.styles_processor
    }

    /// Register a change listener
    pub fn add_listener(&mut self, listener: Box<dyn ChangeListener>) {
        tracing::debug!("Registered change listener: {}", listener.name());
        self.listeners.push(listener);
    }

    pub fn get(&self, node_id: NodeId) -> Result<&ViewNode> {
        self.arena.get(node_id)
    }

    pub fn element(&self, node_id: NodeId) -> Result<&Element> {
        let node = self.arena.get(node_id)?;
        node.as_element().ok_or_else(|| ViewError::InvalidNodeType {
            expected: "element".to_string(),
            actual: node.type_name().to_string(),
        })
    }

    fn element_mut(&mut self, node_id: NodeId) -> Result<&mut Element> {
        let node = self.arena.get_mut(node_id)?;
        let actual = node.type_name().to_string();
        node.as_element_mut().ok_or(ViewError::InvalidNodeType {
            expected: "element".to_string(),
            actual,
        })
    }

    /// Whether the node is an element of the named kind
    /// (`"containerElement"`, `"attribute"`, ...).
    pub fn is_element_kind(&self, node_id: NodeId, kind: &str) -> bool {
        let Some(expected) = ElementKind::from_name(kind) else {
            return false;
        };
        self.element(node_id)
            .is_ok_and(|element| element.kind().as_str() == expected.as_str())
    }

    pub fn text(&self, node_id: NodeId) -> Result<&str> {
        let node = self.arena.get(node_id)?;
        node.as_text().ok_or_else(|| ViewError::InvalidNodeType {
            expected: "text".to_string(),
            actual: node.type_name().to_string(),
        })
    }

    pub fn parent(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.arena.get(node_id)?.parent)
    }

    pub fn children(&self, node_id: NodeId) -> Result<&[NodeId]> {
        Ok(self.arena.get(node_id)?.children())
    }

    pub fn child_count(&self, node_id: NodeId) -> Result<usize> {
        Ok(self.children(node_id)?.len())
    }

    pub fn child(&self, node_id: NodeId, index: usize) -> Result<Option<NodeId>> {
        Ok(self.children(node_id)?.get(index).copied())
    }

    /// Position of a node among its parent's children.
    pub fn child_index(&self, node_id: NodeId) -> Result<Option<usize>> {
        let Some(parent) = self.parent(node_id)? else {
            return Ok(None);
        };
        Ok(self
            .children(parent)?
            .iter()
            .position(|&child| child == node_id))
    }

    /// Child indexes from the root down to the node.
    pub fn path(&self, node_id: NodeId) -> Result<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = node_id;

        while let Some(index) = self.child_index(current)? {
            path.push(index);
            current = self.parent(current)?.unwrap_or(current);
        }

        path.reverse();
        Ok(path)
    }

    /// Ancestors, nearest first.
    pub fn ancestors(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        self.arena.ancestors(node_id)
    }

    /// Concatenated text of a subtree.
    pub fn text_content(&self, node_id: NodeId) -> Result<String> {
        let mut text = String::new();
        self.arena.traverse_df(node_id, |_, node| {
            if let Some(data) = node.as_text() {
                text.push_str(data);
            }
            Ok(())
        })?;
        Ok(text)
    }

    /// Nearest ancestor element matching any of `patterns`.
    ///
    /// The search stops at a document fragment, which is never returned.
    pub fn find_ancestor<I, P>(&self, node_id: NodeId, patterns: I) -> Result<Option<NodeId>>
    where
        I: IntoIterator<Item = P>,
        P: Into<Pattern>,
    {
        self.find_ancestor_matching(node_id, &Matcher::with_patterns(patterns))
    }

    pub fn find_ancestor_matching(&self, node_id: NodeId, matcher: &Matcher) -> Result<Option<NodeId>> {
        let mut current = self.arena.get(node_id)?.parent;

        while let Some(id) = current {
            let node = self.arena.get(id)?;
            match node.data() {
                NodeData::DocumentFragment(_) => return Ok(None),
                NodeData::Element(element) if matcher.match_element(element).is_some() => {
                    return Ok(Some(id));
                }
                _ => current = node.parent,
            }
        }

        Ok(None)
    }

    /// Offset at which a block filler belongs, if any.
    pub fn filler_offset(&self, node_id: NodeId) -> Result<Option<usize>> {
        let element = self.element(node_id)?;

        if let Some(filler_offset) = element.filler_offset_override() {
            return Ok(filler_offset(self, node_id));
        }

        match element.kind() {
            ElementKind::Container | ElementKind::Editable => self.container_filler_offset(element),
            ElementKind::Attribute { .. } => self.attribute_filler_offset(node_id, element),
            ElementKind::Empty | ElementKind::Ui | ElementKind::Raw => Ok(None),
        }
    }

    fn is_ui_element(&self, node_id: NodeId) -> Result<bool> {
        Ok(matches!(
            self.arena.get(node_id)?.as_element().map(Element::kind),
            Some(ElementKind::Ui)
        ))
    }

    fn container_filler_offset(&self, element: &Element) -> Result<Option<usize>> {
        let children = element.children();

        if let Some(&last) = children.last() {
            if self.arena.get(last)?.as_element().map(Element::name) == Some("br") {
                return Ok(Some(children.len()));
            }
        }

        for &child in children {
            if !self.is_ui_element(child)? {
                return Ok(None);
            }
        }

        Ok(Some(children.len()))
    }

    fn attribute_filler_offset(&self, node_id: NodeId, element: &Element) -> Result<Option<usize>> {
        for &child in element.children() {
            if !self.is_ui_element(child)? {
                return Ok(None);
            }
        }

        let mut current = self.parent(node_id)?;
        while let Some(id) = current {
            match self.arena.get(id)?.as_element() {
                Some(ancestor) if matches!(ancestor.kind(), ElementKind::Attribute { .. }) => {
                    if self.non_ui_child_count(id)? > 1 {
                        return Ok(None);
                    }
                    current = self.parent(id)?;
                }
                _ => break,
            }
        }

        match current {
            Some(id) if self.non_ui_child_count(id)? <= 1 => Ok(Some(element.child_count())),
            _ => Ok(None),
        }
    }

    fn non_ui_child_count(&self, node_id: NodeId) -> Result<usize> {
        let mut count = 0;
        for &child in self.children(node_id)? {
            if !self.is_ui_element(child)? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn fire_change(&mut self, kind: ChangeKind, node_id: NodeId) {
        tracing::trace!(?kind, node = node_id, "view change");

        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in listeners.iter_mut() {
            listener.on_change(kind, node_id, self);
        }
        self.listeners = listeners;
    }

    pub(crate) fn create_element<I, K, V>(
        &mut self,
        name: &str,
        kind: ElementKind,
        attributes: I,
    ) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeInput>,
    {
        let element = Element::new(name, kind, attributes, Rc::clone(&self.styles_processor));
        let node_id = self.arena.add_node(ViewNode::new(NodeData::Element(element)));
        tracing::trace!(node = node_id, name, "created element");
        node_id
    }

    pub(crate) fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.arena
            .add_node(ViewNode::new(NodeData::Text(Text::new(data))))
    }

    pub(crate) fn create_document_fragment(&mut self) -> NodeId {
        self.arena.add_node(ViewNode::new(NodeData::DocumentFragment(
            DocumentFragment::default(),
        )))
    }

    pub(crate) fn set_attribute(
        &mut self,
        node_id: NodeId,
        key: &str,
        value: AttributeInput,
        reset: bool,
    ) -> Result<()> {
        self.element(node_id)?;
        self.fire_change(ChangeKind::Attributes, node_id);
        self.element_mut(node_id)?.set_attribute(key, value, reset);
        Ok(())
    }

    pub(crate) fn remove_attribute(
        &mut self,
        node_id: NodeId,
        key: &str,
        tokens: Option<&[String]>,
    ) -> Result<bool> {
        self.element(node_id)?;
        self.fire_change(ChangeKind::Attributes, node_id);
        Ok(self.element_mut(node_id)?.remove_attribute(key, tokens))
    }

    /// Merge `source`'s attributes into `target` when they do not conflict.
    pub(crate) fn merge_attributes_from(&mut self, target: NodeId, source: NodeId) -> Result<bool> {
        let other = self.element(source)?.shallow_clone();
        if !self.element(target)?.can_merge_attributes_from(&other) {
            return Ok(false);
        }

        self.fire_change(ChangeKind::Attributes, target);
        self.element_mut(target)?.merge_attributes_from(&other);
        Ok(true)
    }

    /// Remove `source`'s attributes from `target` when all of them are present.
    pub(crate) fn subtract_attributes_of(&mut self, target: NodeId, source: NodeId) -> Result<bool> {
        let other = self.element(source)?.shallow_clone();
        if !self.element(target)?.has_attributes_matching(&other) {
            return Ok(false);
        }

        self.fire_change(ChangeKind::Attributes, target);
        self.element_mut(target)?.subtract_attributes_of(&other);
        Ok(true)
    }

    pub(crate) fn set_custom_property(
        &mut self,
        node_id: NodeId,
        key: PropertyKey,
        value: Rc<dyn Any>,
    ) -> Result<()> {
        self.element_mut(node_id)?.set_custom_property(key, value);
        Ok(())
    }

    pub(crate) fn remove_custom_property(&mut self, node_id: NodeId, key: &PropertyKey) -> Result<bool> {
        Ok(self.element_mut(node_id)?.remove_custom_property(key))
    }

    pub(crate) fn set_unsafe_attributes(&mut self, node_id: NodeId, names: Vec<String>) -> Result<()> {
        self.element_mut(node_id)?.set_unsafe_attributes(names);
        Ok(())
    }

    pub(crate) fn set_filler_offset(
        &mut self,
        node_id: NodeId,
        filler_offset: Option<FillerOffsetFn>,
    ) -> Result<()> {
        self.element_mut(node_id)?.set_filler_offset(filler_offset);
        Ok(())
    }

    /// Resolve inputs without touching the arena: text proxies are sliced,
    /// fragments contribute their children.
    fn resolve_children(&self, items: Vec<ChildInput>) -> Result<Vec<PendingChild>> {
        let mut pending = Vec::with_capacity(items.len());

        for item in items {
            match item {
                ChildInput::Text(data) => pending.push(PendingChild::Text(data)),
                ChildInput::TextProxy(proxy) => {
                    let data = proxy.slice(self.text(proxy.text)?);
                    pending.push(PendingChild::Text(data));
                }
                ChildInput::Node(node_id) => {
                    let node = self.arena.get(node_id)?;
                    if node.is_document_fragment() {
                        pending.extend(node.children().iter().copied().map(PendingChild::Node));
                    } else {
                        pending.push(PendingChild::Node(node_id));
                    }
                }
            }
        }

        Ok(pending)
    }

    fn check_accepts_children(&self, parent: NodeId) -> Result<()> {
        let node = self.arena.get(parent)?;
        match node.data() {
            NodeData::Element(element) if !element.kind().accepts_children() => {
                Err(ViewError::ChildrenNotAllowed {
                    name: element.name().to_string(),
                })
            }
            NodeData::Text(_) => Err(ViewError::InvalidNodeType {
                expected: "element or documentFragment".to_string(),
                actual: node.type_name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Insert children at `index`, detaching each from its previous parent.
    /// Returns the number of inserted nodes. A node listed more than once
    /// is inserted at its first position and counted once.
    pub(crate) fn insert_children(
        &mut self,
        parent: NodeId,
        index: usize,
        items: Vec<ChildInput>,
    ) -> Result<usize> {
        self.check_accepts_children(parent)?;

        let len = self.child_count(parent)?;
        if index > len {
            return Err(ViewError::OutOfRange { index, end: index, len });
        }

        let mut pending = self.resolve_children(items)?;
        let mut seen = AHashSet::new();
        pending.retain(|child| match child {
            PendingChild::Node(node_id) => seen.insert(*node_id),
            PendingChild::Text(_) => true,
        });

        for child in &pending {
            if let PendingChild::Node(node_id) = *child {
                if self.arena.contains(node_id, parent)? {
                    return Err(ViewError::HierarchyRequest { child: node_id });
                }
            }
        }

        let nodes: Vec<NodeId> = pending
            .into_iter()
            .map(|child| match child {
                PendingChild::Text(data) => self.create_text(data),
                PendingChild::Node(node_id) => node_id,
            })
            .collect();

        self.fire_change(ChangeKind::Children, parent);

        let mut index = index;
        for &node_id in &nodes {
            if let Some(old_parent) = self.parent(node_id)? {
                if let Some(old_index) = self.child_index(node_id)? {
                    self.remove_children(old_parent, old_index, 1)?;
                }
            }

            let children = self
                .arena
                .get_mut(parent)?
                .children_mut()
                .ok_or(ViewError::NodeNotFound(parent))?;
            let at = index.min(children.len());
            children.insert(at, node_id);
            self.arena.get_mut(node_id)?.parent = Some(parent);
            index = at + 1;
        }

        Ok(nodes.len())
    }

    pub(crate) fn append_children(&mut self, parent: NodeId, items: Vec<ChildInput>) -> Result<usize> {
        let len = self.child_count(parent)?;
        self.insert_children(parent, len, items)
    }

    /// Remove `count` children starting at `index`, returns them detached.
    pub(crate) fn remove_children(
        &mut self,
        parent: NodeId,
        index: usize,
        count: usize,
    ) -> Result<Vec<NodeId>> {
        let len = self.child_count(parent)?;
        let end = index.saturating_add(count);
        if end > len {
            return Err(ViewError::OutOfRange { index, end, len });
        }

        self.fire_change(ChangeKind::Children, parent);

        let removed: Vec<NodeId> = match self.arena.get_mut(parent)?.children_mut() {
            Some(children) => children.drain(index..end).collect(),
            None => Vec::new(),
        };

        for &child in &removed {
            self.arena.get_mut(child)?.parent = None;
        }

        Ok(removed)
    }

    /// Free a detached node and its subtree. Its id, and the ids of its
    /// descendants, must not be used afterwards.
    pub(crate) fn release(&mut self, node_id: NodeId) -> Result<usize> {
        let freed = self.arena.release(node_id)?;
        tracing::trace!(node = node_id, freed, "released view subtree");
        Ok(freed)
    }

    /// Copy a node. With `deep`, children are copied recursively.
    ///
    /// The copy is detached. Attribute values are deep-copied, custom
    /// property values, the unsafe attribute list and the filler offset
    /// override are shared with the original.
    pub(crate) fn clone_node(&mut self, node_id: NodeId, deep: bool) -> Result<NodeId> {
        let node = self.arena.get(node_id)?;
        let children: Vec<NodeId> = if deep { node.children().to_vec() } else { Vec::new() };

        let data = match node.data() {
            NodeData::Text(text) => NodeData::Text(text.clone()),
            NodeData::Element(element) => NodeData::Element(element.shallow_clone()),
            NodeData::DocumentFragment(_) => NodeData::DocumentFragment(DocumentFragment::default()),
        };

        let clone_id = self.arena.add_node(ViewNode::new(data));

        for child in children {
            let child_clone = self.clone_node(child, true)?;
            if let Some(list) = self.arena.get_mut(clone_id)?.children_mut() {
                list.push(child_clone);
            }
            self.arena.get_mut(child_clone)?.parent = Some(clone_id);
        }

        Ok(clone_id)
    }
}

enum PendingChild {
    Text(String),
    Node(NodeId),
}

impl Default for ViewDocument {
    fn default() -> Self {
        Self::new()
    }
}
