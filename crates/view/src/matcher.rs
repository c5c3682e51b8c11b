//! Structural element patterns
//!
//! A matcher only looks at an element through its attribute surface
//! (`attributes_match`, `has_attribute`, names). It never walks the tree.

use crate::element::Element;
use crate::types::AttributeMatch;
use regex::Regex;
use std::fmt;
use std::rc::Rc;

/// Single value test.
#[derive(Debug, Clone)]
pub enum PatternValue {
    /// Matches anything.
    Any,
    Exact(String),
    Regex(Regex),
}

impl PatternValue {
    /// Compile a regex pattern.
    pub fn regex(pattern: &str) -> crate::Result<Self> {
        Ok(PatternValue::Regex(Regex::new(pattern)?))
    }

    pub fn is_match(&self, value: &str) -> bool {
        match self {
            PatternValue::Any => true,
            PatternValue::Exact(expected) => expected == value,
            PatternValue::Regex(regex) => regex.is_match(value),
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, PatternValue::Regex(_))
    }

    pub fn as_exact(&self) -> Option<&str> {
        match self {
            PatternValue::Exact(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for PatternValue {
    fn from(value: &str) -> Self {
        PatternValue::Exact(value.to_string())
    }
}

impl From<String> for PatternValue {
    fn from(value: String) -> Self {
        PatternValue::Exact(value)
    }
}

impl From<Regex> for PatternValue {
    fn from(regex: Regex) -> Self {
        PatternValue::Regex(regex)
    }
}

/// `(key, token, value)` triple tested against one attribute.
///
/// For plain attributes `token` tests the whole value. For token sets it
/// tests each token, for style maps each style name, with `value` testing
/// the style value.
#[derive(Debug, Clone)]
pub struct PropertyPattern {
    pub key: PatternValue,
    pub token: PatternValue,
    pub value: PatternValue,
}

impl PropertyPattern {
    pub fn new(key: impl Into<PatternValue>, token: impl Into<PatternValue>) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
            value: PatternValue::Any,
        }
    }

    pub fn with_value(
        key: impl Into<PatternValue>,
        token: impl Into<PatternValue>,
        value: impl Into<PatternValue>,
    ) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
            value: value.into(),
        }
    }
}

/// Literal description of an element.
#[derive(Debug, Clone, Default)]
pub struct ElementPattern {
    pub name: Option<PatternValue>,
    pub attributes: Vec<(PatternValue, PatternValue)>,
    pub classes: Vec<PatternValue>,
    pub styles: Vec<(PatternValue, PatternValue)>,
}

impl ElementPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<PatternValue>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn attribute(mut self, key: impl Into<PatternValue>, value: impl Into<PatternValue>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Require the attribute to be present, whatever its value.
    pub fn has_attribute(self, key: impl Into<PatternValue>) -> Self {
        self.attribute(key, PatternValue::Any)
    }

    pub fn class(mut self, class: impl Into<PatternValue>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn style(mut self, name: impl Into<PatternValue>, value: impl Into<PatternValue>) -> Self {
        self.styles.push((name.into(), value.into()));
        self
    }

    fn match_element(&self, element: &Element) -> Option<MatchResult> {
        let mut result = MatchResult::default();

        if let Some(name) = &self.name {
            if !name.is_match(element.name()) {
                return None;
            }
            result.name = true;
        }

        for (key, value) in &self.attributes {
            let pattern = PropertyPattern::new(key.clone(), value.clone());
            // only an explicit key reaches the structured attributes
            let exclude: &[&str] = match key.as_exact() {
                Some(_) => &[],
                None => &["class", "style"],
            };
            let matched = element.attributes_match(std::slice::from_ref(&pattern), exclude)?;
            result.attributes.extend(matched);
        }

        for class in &self.classes {
            let pattern = PropertyPattern::new("class", class.clone());
            let matched = element.attributes_match(std::slice::from_ref(&pattern), &[])?;
            result.attributes.extend(matched);
        }

        for (name, value) in &self.styles {
            let pattern = PropertyPattern::with_value("style", name.clone(), value.clone());
            let matched = element.attributes_match(std::slice::from_ref(&pattern), &[])?;
            result.attributes.extend(matched);
        }

        Some(result)
    }
}

/// A single matcher pattern.
#[derive(Clone)]
pub enum Pattern {
    Element(ElementPattern),
    Predicate(Rc<dyn Fn(&Element) -> bool>),
}

impl Pattern {
    pub fn predicate(predicate: impl Fn(&Element) -> bool + 'static) -> Self {
        Pattern::Predicate(Rc::new(predicate))
    }

    fn match_element(&self, element: &Element) -> Option<MatchResult> {
        match self {
            Pattern::Element(pattern) => pattern.match_element(element),
            Pattern::Predicate(predicate) => predicate(element).then(MatchResult::default),
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Element(pattern) => f.debug_tuple("Element").field(pattern).finish(),
            Pattern::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<ElementPattern> for Pattern {
    fn from(pattern: ElementPattern) -> Self {
        Pattern::Element(pattern)
    }
}

impl From<&str> for Pattern {
    fn from(name: &str) -> Self {
        Pattern::Element(ElementPattern::new().name(name))
    }
}

impl From<Regex> for Pattern {
    fn from(name: Regex) -> Self {
        Pattern::Element(ElementPattern::new().name(name))
    }
}

/// What a pattern matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// The name test was part of the pattern and passed.
    pub name: bool,
    pub attributes: Vec<AttributeMatch>,
}

/// Successful match of one of the matcher's patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherMatch {
    /// Index of the pattern that matched.
    pub pattern: usize,
    pub result: MatchResult,
}

/// Ordered list of alternative patterns.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    patterns: Vec<Pattern>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patterns<I, P>(patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Pattern>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add(&mut self, pattern: impl Into<Pattern>) {
        self.patterns.push(pattern.into());
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// First pattern matching `element`.
    pub fn match_element(&self, element: &Element) -> Option<MatcherMatch> {
        self.patterns
            .iter()
            .enumerate()
            .find_map(|(pattern, candidate)| {
                candidate
                    .match_element(element)
                    .map(|result| MatcherMatch { pattern, result })
            })
    }

    /// Every pattern matching `element`.
    pub fn match_all(&self, element: &Element) -> Vec<MatcherMatch> {
        self.patterns
            .iter()
            .enumerate()
            .filter_map(|(pattern, candidate)| {
                candidate
                    .match_element(element)
                    .map(|result| MatcherMatch { pattern, result })
            })
            .collect()
    }

    /// The element name, when the matcher is a single pattern with a literal name.
    pub fn element_name(&self) -> Option<&str> {
        match self.patterns.as_slice() {
            [Pattern::Element(pattern)] => pattern.name.as_ref().and_then(PatternValue::as_exact),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeInput;
    use crate::styles::StylesProcessor;
    use crate::types::ElementKind;

    fn element(name: &str, attributes: &[(&str, &str)]) -> Element {
        Element::new(
            name,
            ElementKind::Container,
            attributes.iter().copied(),
            Rc::new(StylesProcessor::with_default_rules()),
        )
    }

    #[test]
    fn test_name_patterns() {
        let matcher = Matcher::with_patterns(["p"]);
        assert!(matcher.match_element(&element("p", &[])).is_some());
        assert!(matcher.match_element(&element("div", &[])).is_none());
        assert_eq!(matcher.element_name(), Some("p"));

        let regex = Matcher::with_patterns([Regex::new("^h[1-6]$").unwrap()]);
        assert!(regex.match_element(&element("h2", &[])).is_some());
        assert_eq!(regex.element_name(), None);
    }

    #[test]
    fn test_element_pattern_collects_matches() {
        let el = element(
            "span",
            &[("class", "foo bar"), ("style", "color:red"), ("data-x", "1")],
        );
        let pattern = ElementPattern::new()
            .name("span")
            .class("foo")
            .style("color", "red")
            .has_attribute("data-x");

        let matched = Matcher::with_patterns([pattern])
            .match_element(&el)
            .unwrap();
        assert!(matched.result.name);
        assert_eq!(
            matched.result.attributes,
            vec![
                ("data-x".to_string(), None),
                ("class".to_string(), Some("foo".to_string())),
                ("style".to_string(), Some("color".to_string())),
            ]
        );
    }

    #[test]
    fn test_regex_attribute_key_skips_class_and_style() {
        let el = element("span", &[("class", "foo"), ("title", "t")]);
        let pattern = ElementPattern::new().attribute(Regex::new(".*").unwrap(), PatternValue::Any);

        let matched = Matcher::with_patterns([pattern]).match_element(&el).unwrap();
        assert_eq!(matched.result.attributes, vec![("title".to_string(), None)]);
    }

    #[test]
    fn test_predicate_and_match_all() {
        let mut matcher = Matcher::new();
        matcher.add(Pattern::predicate(|el| el.has_attribute("id", None)));
        matcher.add("a");

        let anchor = Element::new(
            "a",
            ElementKind::attribute(),
            [("id", AttributeInput::from("x"))],
            Rc::new(StylesProcessor::new()),
        );

        assert_eq!(matcher.match_element(&anchor).map(|m| m.pattern), Some(0));
        assert_eq!(matcher.match_all(&anchor).len(), 2);
        assert!(matcher.match_element(&element("b", &[])).is_none());
    }

    #[test]
    fn test_missing_class_fails() {
        let el = element("p", &[("class", "foo")]);
        let matcher = Matcher::with_patterns([ElementPattern::new().class("bar")]);
        assert!(matcher.match_element(&el).is_none());
    }
}
