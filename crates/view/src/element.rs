//! View element
//!
//! The element owns its attributes and the ids of its children. Everything
//! that touches other nodes (reparenting, ancestors, filler placement) lives
//! on [`ViewDocument`], which owns the arena.
//!
//! Mutators here are crate-private. They are only reached through the
//! document, after it has fired the matching change notification.

use crate::attribute::{AttributeInput, AttributeValue};
use crate::document::ViewDocument;
use crate::matcher::PropertyPattern;
use crate::node::Children;
use crate::styles::{StylesMap, StylesProcessor};
use crate::token_list::TokenList;
use crate::types::{uses_styles_map, uses_token_list, AttributeMatch, ElementKind, NodeId};
use ahash::{AHashMap, RandomState};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Per-instance replacement of the default filler offset computation.
pub type FillerOffsetFn = Rc<dyn Fn(&ViewDocument, NodeId) -> Option<usize>>;

/// Key of a custom property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Name(String),
    /// Opaque key, only reachable by whoever holds it.
    Symbol(Uuid),
}

impl PropertyKey {
    /// A fresh key distinct from every other key.
    pub fn symbol() -> Self {
        PropertyKey::Symbol(Uuid::new_v4())
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        PropertyKey::Name(name.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(name: String) -> Self {
        PropertyKey::Name(name)
    }
}

/// What a converter may consume from an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consumables {
    /// The element itself.
    pub name: bool,
    pub attributes: Vec<AttributeMatch>,
}

#[derive(Clone)]
pub struct Element {
    name: String,
    kind: ElementKind,
    attributes: IndexMap<String, AttributeValue, RandomState>,
    pub(crate) children: Children,
    custom_properties: AHashMap<PropertyKey, Rc<dyn Any>>,
    unsafe_attributes: Rc<[String]>,
    filler_offset: Option<FillerOffsetFn>,
    styles_processor: Rc<StylesProcessor>,
}

impl Element {
    /// Build a detached element, normalizing `attributes`.
    pub(crate) fn new<I, K, V>(
        name: impl Into<String>,
        kind: ElementKind,
        attributes: I,
        styles_processor: Rc<StylesProcessor>,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeInput>,
    {
        let mut element = Self {
            name: name.into(),
            kind,
            attributes: IndexMap::default(),
            children: Children::new(),
            custom_properties: AHashMap::new(),
            unsafe_attributes: Rc::from(Vec::new()),
            filler_offset: None,
            styles_processor,
        };

        for (key, value) in attributes {
            let key: String = key.into();
            if let Some(value) = element.normalize(&key, value.into()) {
                element.attributes.insert(key, value);
            }
        }

        element
    }

    /// Convert an input into the stored form for `key` on this element.
    fn normalize(&self, key: &str, value: AttributeInput) -> Option<AttributeValue> {
        if value.is_null() {
            return None;
        }

        let value = if uses_token_list(&self.name, key) {
            AttributeValue::Tokens(value.to_token_list())
        } else if uses_styles_map(key) {
            AttributeValue::Styles(value.to_styles_map(&self.styles_processor))
        } else {
            AttributeValue::Plain(value.to_text())
        };

        Some(value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Priority of attribute elements, `None` for other kinds.
    pub fn priority(&self) -> Option<i32> {
        match &self.kind {
            ElementKind::Attribute { priority, .. } => Some(*priority),
            _ => None,
        }
    }

    /// Id of attribute elements (not the `id` attribute).
    pub fn id(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Attribute { id, .. } => id.as_deref(),
            _ => None,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn styles_processor(&self) -> &Rc<StylesProcessor> {
        &self.styles_processor
    }

    /// Attribute keys: `class` first, then `style`, then the rest in storage order.
    pub fn attribute_keys(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.attributes.len());
        for first in ["class", "style"] {
            if self.attributes.contains_key(first) {
                keys.push(first);
            }
        }
        keys.extend(
            self.attributes
                .keys()
                .map(String::as_str)
                .filter(|key| *key != "class" && *key != "style"),
        );
        keys
    }

    /// `(key, value)` pairs in [`Element::attribute_keys`] order, structured values as strings.
    pub fn attributes(&self) -> Vec<(&str, String)> {
        self.attribute_keys()
            .into_iter()
            .filter_map(|key| self.attributes.get(key).map(|value| (key, value.to_string())))
            .collect()
    }

    /// Stored value, structured kinds included.
    pub fn attribute_value(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn get_attribute(&self, key: &str) -> Option<String> {
        self.attributes.get(key).map(ToString::to_string)
    }

    /// Existence check, or with `token` a membership test (structured) or
    /// exact comparison (plain).
    pub fn has_attribute(&self, key: &str, token: Option<&str>) -> bool {
        match (self.attributes.get(key), token) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(value), Some(token)) => value.has(token),
        }
    }

    pub fn class_names(&self) -> Vec<&str> {
        match self.attributes.get("class") {
            Some(AttributeValue::Tokens(tokens)) => tokens.keys().collect(),
            _ => Vec::new(),
        }
    }

    /// Whether every one of `names` is a class of this element.
    pub fn has_class(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.has_attribute("class", Some(name)))
    }

    pub fn get_style(&self, name: &str) -> Option<String> {
        match self.attributes.get("style") {
            Some(AttributeValue::Styles(styles)) => styles.get_as_string(name),
            _ => None,
        }
    }

    pub fn style_names(&self, expand: bool) -> Vec<String> {
        match self.attributes.get("style") {
            Some(AttributeValue::Styles(styles)) => styles.keys(expand),
            _ => Vec::new(),
        }
    }

    /// Whether every one of `names` is a style of this element.
    pub fn has_style(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.has_attribute("style", Some(name)))
    }

    pub fn custom_property(&self, key: &PropertyKey) -> Option<&Rc<dyn Any>> {
        self.custom_properties.get(key)
    }

    /// Custom property downcast to `T`.
    pub fn custom_property_as<T: 'static>(&self, key: &PropertyKey) -> Option<&T> {
        self.custom_properties
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn custom_properties(&self) -> impl Iterator<Item = (&PropertyKey, &Rc<dyn Any>)> {
        self.custom_properties.iter()
    }

    pub fn unsafe_attributes(&self) -> &Rc<[String]> {
        &self.unsafe_attributes
    }

    /// Whether `key` is exempt from output filtering.
    pub fn should_render_unsafe_attribute(&self, key: &str) -> bool {
        self.unsafe_attributes.iter().any(|name| name == key)
    }

    pub fn filler_offset_override(&self) -> Option<&FillerOffsetFn> {
        self.filler_offset.as_ref()
    }

    /// Same name, kind and attributes. Children are not compared.
    ///
    /// Attribute elements with an id are similar only to elements with the
    /// same id. Without ids, priorities must match too.
    pub fn is_similar(&self, other: &Element) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }

        match (&self.kind, &other.kind) {
            (
                ElementKind::Attribute { priority, id },
                ElementKind::Attribute {
                    priority: other_priority,
                    id: other_id,
                },
            ) => {
                if id.is_some() || other_id.is_some() {
                    return id == other_id;
                }
                if priority != other_priority {
                    return false;
                }
            }
            (kind, other_kind) => {
                if std::mem::discriminant(kind) != std::mem::discriminant(other_kind) {
                    return false;
                }
            }
        }

        if self.name != other.name || self.attributes.len() != other.attributes.len() {
            return false;
        }

        self.attributes.iter().all(|(key, value)| {
            other
                .attributes
                .get(key)
                .is_some_and(|other_value| value.is_similar(other_value))
        })
    }

    /// Whether `other`'s attributes can be merged in without conflicts.
    /// Keys missing here never conflict.
    pub fn can_merge_attributes_from(&self, other: &Element) -> bool {
        if self.name != other.name {
            return false;
        }

        other.attributes.iter().all(|(key, other_value)| {
            self.attributes
                .get(key)
                .map_or(true, |value| value.can_merge_from(other_value))
        })
    }

    /// Whether every attribute of `other` is present here. A missing key is a mismatch.
    pub fn has_attributes_matching(&self, other: &Element) -> bool {
        if self.name != other.name {
            return false;
        }

        other.attributes.iter().all(|(key, other_value)| {
            self.attributes
                .get(key)
                .is_some_and(|value| value.is_matching(other_value))
        })
    }

    /// Canonical `name class="a,b" style="k:v;" key="value"` string.
    ///
    /// Classes and other token lists are sorted, styles use their canonical
    /// form, remaining attributes are sorted. Similar elements produce equal
    /// identities.
    pub fn identity(&self) -> String {
        let classes = match self.attributes.get("class") {
            Some(AttributeValue::Tokens(tokens)) => tokens.sorted().join(","),
            Some(value) => value.to_string(),
            None => String::new(),
        };

        let styles = self
            .attributes
            .get("style")
            .map(ToString::to_string)
            .unwrap_or_default();

        let mut rest: Vec<String> = self
            .attributes
            .iter()
            .filter(|(key, _)| key.as_str() != "class" && key.as_str() != "style")
            .map(|(key, value)| {
                let value = match value {
                    AttributeValue::Tokens(tokens) => tokens.sorted().join(" "),
                    other => other.to_string(),
                };
                format!("{key}=\"{value}\"")
            })
            .collect();
        rest.sort();

        let mut identity = self.name.clone();
        if !classes.is_empty() {
            identity.push_str(&format!(" class=\"{classes}\""));
        }
        if !styles.is_empty() {
            identity.push_str(&format!(" style=\"{styles}\""));
        }
        if !rest.is_empty() {
            identity.push(' ');
            identity.push_str(&rest.join(" "));
        }
        identity
    }

    /// Match attribute patterns, collecting matched `(key, token)` units.
    ///
    /// Every pattern must find a key and a matching value. A regex key
    /// pattern is the exception: keys it matches without a matching value
    /// are reported as key-only units and do not fail the match.
    pub fn attributes_match(
        &self,
        patterns: &[PropertyPattern],
        exclude: &[&str],
    ) -> Option<Vec<AttributeMatch>> {
        let mut matched = Vec::new();

        for pattern in patterns {
            let tolerant = pattern.key.is_regex();
            let mut has_key = false;
            let mut has_value = false;

            for (key, value) in &self.attributes {
                if exclude.contains(&key.as_str()) || !pattern.key.is_match(key) {
                    continue;
                }

                has_key = true;

                match value {
                    AttributeValue::Plain(text) => {
                        if pattern.token.is_match(text) {
                            matched.push((key.clone(), None));
                            has_value = true;
                        } else if tolerant {
                            matched.push((key.clone(), None));
                        } else {
                            return None;
                        }
                    }
                    structured => match structured.tokens_match(&pattern.token, &pattern.value) {
                        Some(tokens) => {
                            has_value = true;
                            matched.extend(tokens.into_iter().map(|t| (key.clone(), Some(t))));
                        }
                        None if tolerant => matched.push((key.clone(), None)),
                        None => return None,
                    },
                }
            }

            if !has_key || (!has_value && !tolerant) {
                return None;
            }
        }

        Some(matched)
    }

    /// Consumable units of the whole element, or of a single attribute.
    pub fn consumables(&self, key: Option<&str>, token: Option<&str>) -> Consumables {
        let mut attributes = Vec::new();

        match key {
            Some(key) => {
                if let Some(value) = self.attributes.get(key) {
                    attributes.extend(
                        value
                            .consumables(token)
                            .into_iter()
                            .map(|unit| (key.to_string(), unit)),
                    );
                }
            }
            None => {
                for key in self.attribute_keys() {
                    if let Some(value) = self.attributes.get(key) {
                        attributes.extend(
                            value
                                .consumables(None)
                                .into_iter()
                                .map(|unit| (key.to_string(), unit)),
                        );
                    }
                }
            }
        }

        Consumables {
            name: key.is_none(),
            attributes,
        }
    }

    pub(crate) fn set_attribute(&mut self, key: &str, value: AttributeInput, reset: bool) {
        if value.is_null() {
            self.attributes.shift_remove(key);
            return;
        }

        if uses_token_list(&self.name, key) {
            let incoming = value.to_token_list();
            let current = self
                .attributes
                .entry(key.to_string())
                .or_insert_with(|| AttributeValue::Tokens(TokenList::new()));

            match current {
                AttributeValue::Tokens(tokens) if !reset => tokens.merge_from(&incoming),
                other => *other = AttributeValue::Tokens(incoming),
            }
        } else if uses_styles_map(key) {
            let incoming = value.to_styles_map(&self.styles_processor);
            let processor = Rc::clone(&self.styles_processor);
            let current = self
                .attributes
                .entry(key.to_string())
                .or_insert_with(|| AttributeValue::Styles(StylesMap::new(processor)));

            match current {
                AttributeValue::Styles(styles) if !reset => styles.merge_from(&incoming),
                other => *other = AttributeValue::Styles(incoming),
            }
        } else {
            self.attributes
                .insert(key.to_string(), AttributeValue::Plain(value.to_text()));
        }
    }

    /// Remove the whole key, or with `tokens` only those tokens of a
    /// structured value. An emptied structured value drops its key.
    pub(crate) fn remove_attribute(&mut self, key: &str, tokens: Option<&[String]>) -> bool {
        let Some(tokens) = tokens else {
            return self.attributes.shift_remove(key).is_some();
        };

        if !self
            .attributes
            .get(key)
            .is_some_and(AttributeValue::is_structured)
        {
            return self.attributes.shift_remove(key).is_some();
        }

        let Some(value) = self.attributes.get_mut(key) else {
            return false;
        };

        let removed = match value {
            AttributeValue::Plain(_) => false,
            AttributeValue::Tokens(list) => list.remove(tokens),
            AttributeValue::Styles(styles) => styles.remove(tokens),
        };

        if value.is_empty() {
            self.attributes.shift_remove(key);
            return true;
        }

        removed
    }

    /// Apply a merge already checked with [`Element::can_merge_attributes_from`].
    pub(crate) fn merge_attributes_from(&mut self, other: &Element) {
        for (key, other_value) in &other.attributes {
            match self.attributes.get_mut(key) {
                Some(value) if value.is_structured() && other_value.is_structured() => {
                    value.merge_from(other_value)
                }
                _ => {
                    self.attributes.insert(key.clone(), other_value.clone());
                }
            }
        }
    }

    /// Apply a subtraction already checked with [`Element::has_attributes_matching`].
    pub(crate) fn subtract_attributes_of(&mut self, other: &Element) {
        for (key, other_value) in &other.attributes {
            let Some(value) = self.attributes.get_mut(key) else {
                continue;
            };

            if value.is_structured() && other_value.is_structured() {
                value.subtract(other_value);
                if value.is_empty() {
                    self.attributes.shift_remove(key);
                }
            } else {
                self.attributes.shift_remove(key);
            }
        }
    }

    pub(crate) fn set_custom_property(&mut self, key: PropertyKey, value: Rc<dyn Any>) {
        self.custom_properties.insert(key, value);
    }

    pub(crate) fn remove_custom_property(&mut self, key: &PropertyKey) -> bool {
        self.custom_properties.remove(key).is_some()
    }

    pub(crate) fn set_unsafe_attributes(&mut self, names: Vec<String>) {
        self.unsafe_attributes = Rc::from(names);
    }

    pub(crate) fn set_filler_offset(&mut self, filler_offset: Option<FillerOffsetFn>) {
        self.filler_offset = filler_offset;
    }

    /// Copy without children. Attributes are deep-copied, custom property
    /// values and the unsafe attribute list are shared.
    pub(crate) fn shallow_clone(&self) -> Self {
        let mut clone = self.clone();
        clone.children.clear();
        clone
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("attributes", &self.attributes())
            .field("children", &self.children)
            .field("custom_properties", &self.custom_properties.len())
            .field("unsafe_attributes", &self.unsafe_attributes)
            .field("filler_offset", &self.filler_offset.is_some())
            .finish()
    }
}
