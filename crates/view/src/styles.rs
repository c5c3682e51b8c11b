//! Normalized CSS declarations
//!
//! ## Design
//!
//! - `StylesMap` stores longhand declarations in insertion order.
//! - Shorthands are expanded on write and reduced on read by a
//!   `StylesProcessor`, which is handed to every map explicitly. There is
//!   no global processor.
//!
//! ```text
//! "margin:1px 2px"  → margin-top:1px margin-right:2px margin-bottom:1px margin-left:2px
//!                   → (reduce) margin:1px 2px
//! ```

use crate::matcher::PatternValue;
use crate::utils::{parse_style_declarations, split_value_parts};
use ahash::{AHashMap, RandomState};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];

const IMPORTANT: &str = "!important";

/// Split a trailing `!important` off a declaration value.
fn split_important(value: &str) -> (&str, bool) {
    let value = value.trim();
    match value.strip_suffix(IMPORTANT) {
        Some(rest) => (rest.trim_end(), true),
        None => (value, false),
    }
}

/// Shorthand expansion and reduction rules.
#[derive(Debug, Clone, Default)]
pub struct StylesProcessor {
    /// shorthand → longhands in top/right/bottom/left order
    shorthands: AHashMap<String, [String; 4]>,
    /// longhand → shorthand
    owners: AHashMap<String, String>,
}

impl StylesProcessor {
    /// Processor without any shorthand rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor with box rules for margin, padding and border sides.
    pub fn with_default_rules() -> Self {
        let mut processor = Self::new();
        processor.add_box_shorthand("margin", SIDES.map(|side| format!("margin-{side}")));
        processor.add_box_shorthand("padding", SIDES.map(|side| format!("padding-{side}")));
        for part in ["color", "style", "width"] {
            processor.add_box_shorthand(
                &format!("border-{part}"),
                SIDES.map(|side| format!("border-{side}-{part}")),
            );
        }
        processor
    }

    /// Register a four-sided shorthand. Longhands are in top/right/bottom/left order.
    pub fn add_box_shorthand(&mut self, shorthand: &str, longhands: [String; 4]) {
        for longhand in &longhands {
            self.owners.insert(longhand.clone(), shorthand.to_string());
        }
        self.shorthands.insert(shorthand.to_string(), longhands);
    }

    pub fn is_shorthand(&self, name: &str) -> bool {
        self.shorthands.contains_key(name)
    }

    pub fn longhands(&self, name: &str) -> Option<&[String; 4]> {
        self.shorthands.get(name)
    }

    /// Expand a declaration into the longhands it stands for.
    ///
    /// Values that do not fit the 1-4 value box syntax are kept under the
    /// shorthand name untouched.
    pub fn expand(&self, name: &str, value: &str) -> Vec<(String, String)> {
        let Some(longhands) = self.shorthands.get(name) else {
            return vec![(name.to_string(), value.trim().to_string())];
        };

        let (bare, important) = split_important(value);
        let parts = split_value_parts(bare);
        let [top, right, bottom, left] = match parts.as_slice() {
            [all] => [*all; 4],
            [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
            [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
            [top, right, bottom, left] => [*top, *right, *bottom, *left],
            _ => return vec![(name.to_string(), value.trim().to_string())],
        };

        longhands
            .iter()
            .cloned()
            .zip([top, right, bottom, left].map(|part| match important {
                true => format!("{part} {IMPORTANT}"),
                false => part.to_string(),
            }))
            .collect()
    }

    /// Collapse complete longhand groups back into their shorthand.
    ///
    /// The shorthand takes the position of its first longhand.
    pub fn reduce(&self, styles: &IndexMap<String, String, RandomState>) -> Vec<(String, String)> {
        let mut reduced = Vec::with_capacity(styles.len());
        let mut emitted: Vec<&str> = Vec::new();

        for (name, value) in styles {
            let Some(shorthand) = self.owners.get(name) else {
                reduced.push((name.clone(), value.clone()));
                continue;
            };

            if emitted.contains(&shorthand.as_str()) {
                continue;
            }

            match self.reduced_value(shorthand, styles) {
                Some(value) => {
                    emitted.push(shorthand);
                    reduced.push((shorthand.clone(), value));
                }
                None => reduced.push((name.clone(), value.clone())),
            }
        }

        reduced
    }

    /// Styles consumed together with `name`: longhands of a shorthand, or
    /// the shorthand owning a longhand.
    pub fn related_styles(&self, name: &str) -> Vec<String> {
        if let Some(longhands) = self.shorthands.get(name) {
            return longhands.to_vec();
        }

        self.owners.get(name).cloned().into_iter().collect()
    }

    fn reduced_value(
        &self,
        shorthand: &str,
        styles: &IndexMap<String, String, RandomState>,
    ) -> Option<String> {
        let longhands = self.shorthands.get(shorthand)?;
        let mut values = [""; 4];
        let mut important = [false; 4];
        for ((slot, flag), longhand) in values.iter_mut().zip(important.iter_mut()).zip(longhands) {
            (*slot, *flag) = split_important(styles.get(longhand)?);
        }

        // Priority applies per declaration, a mixed group cannot share one.
        let important = match important {
            [true, true, true, true] => true,
            [false, false, false, false] => false,
            _ => return None,
        };

        let [top, right, bottom, left] = values;
        let value = if top == right && right == bottom && bottom == left {
            top.to_string()
        } else if top == bottom && right == left {
            format!("{top} {right}")
        } else if right == left {
            format!("{top} {right} {bottom}")
        } else {
            format!("{top} {right} {bottom} {left}")
        };

        Some(match important {
            true => format!("{value} {IMPORTANT}"),
            false => value,
        })
    }
}

/// Normalized `style` attribute value.
#[derive(Debug, Clone)]
pub struct StylesMap {
    styles: IndexMap<String, String, RandomState>,
    processor: Rc<StylesProcessor>,
}

impl StylesMap {
    pub fn new(processor: Rc<StylesProcessor>) -> Self {
        Self {
            styles: IndexMap::default(),
            processor,
        }
    }

    /// Parse a `style` attribute string.
    pub fn parse(text: &str, processor: Rc<StylesProcessor>) -> Self {
        let mut map = Self::new(processor);
        map.set_to(text);
        map
    }

    pub fn processor(&self) -> &Rc<StylesProcessor> {
        &self.processor
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Number of declarations in reduced form.
    pub fn size(&self) -> usize {
        self.entries().len()
    }

    /// Declarations in reduced form, in insertion order.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.processor.reduce(&self.styles)
    }

    /// Replace the whole content with the declarations of `text`.
    pub fn set_to(&mut self, text: &str) {
        self.styles.clear();
        for (name, value) in parse_style_declarations(text) {
            self.set(&name, &value);
        }
    }

    /// Set one declaration, expanding shorthands.
    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.trim().to_ascii_lowercase();
        let expanded = self.processor.expand(&name, value);

        if expanded.iter().all(|(longhand, _)| *longhand != name) {
            self.styles.shift_remove(&name);
        }

        for (longhand, value) in expanded {
            self.styles.insert(longhand, value);
        }
    }

    pub fn set_many<I, K, V>(&mut self, declarations: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in declarations {
            self.set(name.as_ref(), value.as_ref());
        }
    }

    /// Remove declarations by name, shorthands remove all their longhands.
    pub fn remove<I, S>(&mut self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = false;
        for name in names {
            let name = name.as_ref();
            removed |= self.styles.shift_remove(name).is_some();
            if let Some(longhands) = self.processor.longhands(name) {
                for longhand in longhands {
                    removed |= self.styles.shift_remove(longhand).is_some();
                }
            }
        }
        removed
    }

    /// A shorthand counts as present when any of its longhands is.
    pub fn has(&self, name: &str) -> bool {
        if self.styles.contains_key(name) {
            return true;
        }

        self.processor
            .longhands(name)
            .is_some_and(|longhands| longhands.iter().any(|l| self.styles.contains_key(l)))
    }

    /// Value of a declaration. Shorthands only resolve when fully specified.
    pub fn get_as_string(&self, name: &str) -> Option<String> {
        if let Some(value) = self.styles.get(name) {
            return Some(value.clone());
        }

        self.processor.reduced_value(name, &self.styles)
    }

    /// Style names in reduced form. With `expand`, shorthands are followed
    /// by their longhands.
    pub fn keys(&self, expand: bool) -> Vec<String> {
        let mut names = Vec::new();
        for (name, _) in self.entries() {
            if expand {
                if let Some(longhands) = self.processor.longhands(&name) {
                    names.push(name.clone());
                    names.extend(longhands.iter().cloned());
                    continue;
                }
            }
            names.push(name);
        }
        names
    }

    /// Same declarations regardless of insertion order.
    pub fn is_similar(&self, other: &StylesMap) -> bool {
        self.to_string() == other.to_string()
    }

    /// No declaration of `other` conflicts with a declaration here.
    pub fn can_merge_from(&self, other: &StylesMap) -> bool {
        other.entries().into_iter().all(|(name, value)| {
            !self.has(&name) || self.get_as_string(&name).as_deref() == Some(value.as_str())
        })
    }

    pub fn merge_from(&mut self, other: &StylesMap) {
        for (name, value) in other.entries() {
            self.set(&name, &value);
        }
    }

    /// Every declaration of `other` is present here with the same value.
    pub fn is_matching(&self, other: &StylesMap) -> bool {
        other
            .entries()
            .into_iter()
            .all(|(name, value)| self.get_as_string(&name).as_deref() == Some(value.as_str()))
    }

    /// Style names matching `name_pattern` whose value matches `value_pattern`.
    pub fn tokens_match(
        &self,
        name_pattern: &PatternValue,
        value_pattern: &PatternValue,
    ) -> Option<Vec<String>> {
        let mut matched = Vec::new();
        for name in self.keys(true) {
            if !name_pattern.is_match(&name) {
                continue;
            }

            let value_matches = match value_pattern {
                PatternValue::Any => true,
                pattern => self
                    .get_as_string(&name)
                    .is_some_and(|value| pattern.is_match(&value)),
            };

            if value_matches {
                matched.push(name);
            }
        }

        if matched.is_empty() {
            None
        } else {
            Some(matched)
        }
    }

    /// Consumable units: the named style plus related ones, or every style.
    pub fn consumables(&self, name: Option<&str>) -> Vec<String> {
        let mut result = Vec::new();
        match name {
            Some(name) => {
                result.push(name.to_string());
                result.extend(self.processor.related_styles(name));
            }
            None => {
                for (name, _) in self.entries() {
                    result.extend(self.processor.related_styles(&name));
                    result.push(name);
                }
            }
        }
        result
    }
}

impl fmt::Display for StylesMap {
    /// Canonical form: `name:value` pairs sorted, each followed by `;`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut declarations: Vec<String> = self
            .entries()
            .into_iter()
            .map(|(name, value)| format!("{name}:{value}"))
            .collect();
        declarations.sort();

        for declaration in declarations {
            write!(f, "{declaration};")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> Rc<StylesProcessor> {
        Rc::new(StylesProcessor::with_default_rules())
    }

    #[test]
    fn test_shorthand_expands_and_reduces() {
        let styles = StylesMap::parse("margin: 1px 2px; color: red", processor());

        assert_eq!(styles.get_as_string("margin-left").as_deref(), Some("2px"));
        assert_eq!(styles.get_as_string("margin").as_deref(), Some("1px 2px"));
        assert_eq!(styles.size(), 2);
        assert_eq!(styles.to_string(), "color:red;margin:1px 2px;");
    }

    #[test]
    fn test_important_applies_to_every_side() {
        let mut styles = StylesMap::parse("margin: 1px !important", processor());

        assert_eq!(styles.get_as_string("margin-right").as_deref(), Some("1px !important"));
        assert_eq!(styles.get_as_string("margin").as_deref(), Some("1px !important"));
        assert_eq!(styles.to_string(), "margin:1px !important;");

        styles.set("margin-top", "2px");
        assert_eq!(styles.get_as_string("margin"), None);
        assert_eq!(styles.get_as_string("margin-left").as_deref(), Some("1px !important"));
    }

    #[test]
    fn test_partial_shorthand_stays_expanded() {
        let mut styles = StylesMap::parse("margin: 1px", processor());
        styles.remove(["margin-top"]);

        assert!(styles.has("margin"));
        assert_eq!(styles.get_as_string("margin"), None);
        assert_eq!(styles.keys(false), vec!["margin-right", "margin-bottom", "margin-left"]);

        styles.remove(["margin"]);
        assert!(styles.is_empty());
    }

    #[test]
    fn test_unknown_shorthand_is_kept_verbatim() {
        let styles = StylesMap::parse("font: 12px serif", processor());
        assert_eq!(styles.to_string(), "font:12px serif;");
    }

    #[test]
    fn test_merge_rules() {
        let base = StylesMap::parse("color:red;margin:1px", processor());
        let same = StylesMap::parse("color:red", processor());
        let conflict = StylesMap::parse("color:blue", processor());
        let other = StylesMap::parse("font-weight:bold", processor());

        assert!(base.can_merge_from(&same));
        assert!(!base.can_merge_from(&conflict));
        assert!(base.can_merge_from(&other));
        assert!(base.is_matching(&same));
        assert!(!base.is_matching(&other));

        let mut merged = base.clone();
        merged.merge_from(&other);
        assert_eq!(merged.to_string(), "color:red;font-weight:bold;margin:1px;");
    }

    #[test]
    fn test_similar_ignores_order() {
        let a = StylesMap::parse("color:red;top:0", processor());
        let b = StylesMap::parse("top:0;color:red", processor());
        assert!(a.is_similar(&b));
    }

    #[test]
    fn test_consumables_include_related_styles() {
        let styles = StylesMap::parse("margin:1px", processor());

        let all = styles.consumables(None);
        assert_eq!(all.last().map(String::as_str), Some("margin"));
        assert!(all.contains(&"margin-top".to_string()));

        assert_eq!(styles.consumables(Some("margin-top")), vec!["margin-top", "margin"]);
    }

    #[test]
    fn test_tokens_match_checks_values() {
        let styles = StylesMap::parse("color:red;margin:1px", processor());

        assert_eq!(
            styles.tokens_match(&PatternValue::from("color"), &PatternValue::from("red")),
            Some(vec!["color".to_string()])
        );
        assert_eq!(
            styles.tokens_match(&PatternValue::from("color"), &PatternValue::from("blue")),
            None
        );
        assert_eq!(
            styles
                .tokens_match(&PatternValue::from("margin-left"), &PatternValue::Any)
                .map(|m| m.len()),
            Some(1)
        );
    }
}
