//! Attribute values
//!
//! An attribute is either an opaque string or one of two structured kinds.
//! The set is closed: every operation dispatches with an exhaustive `match`.

use crate::matcher::PatternValue;
use crate::styles::{StylesMap, StylesProcessor};
use crate::token_list::TokenList;
use std::fmt;
use std::rc::Rc;

/// Stored attribute value.
#[derive(Debug, Clone)]
pub enum AttributeValue {
    Plain(String),
    Tokens(TokenList),
    Styles(StylesMap),
}

impl AttributeValue {
    pub fn is_structured(&self) -> bool {
        !matches!(self, AttributeValue::Plain(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AttributeValue::Plain(value) => value.is_empty(),
            AttributeValue::Tokens(tokens) => tokens.is_empty(),
            AttributeValue::Styles(styles) => styles.is_empty(),
        }
    }

    /// Membership test for structured values, exact equality for plain ones.
    pub fn has(&self, token: &str) -> bool {
        match self {
            AttributeValue::Plain(value) => value == token,
            AttributeValue::Tokens(tokens) => tokens.has(token),
            AttributeValue::Styles(styles) => styles.has(token),
        }
    }

    /// Token or style names of a structured value.
    pub fn keys(&self) -> Vec<String> {
        match self {
            AttributeValue::Plain(_) => Vec::new(),
            AttributeValue::Tokens(tokens) => tokens.keys().map(str::to_string).collect(),
            AttributeValue::Styles(styles) => styles.keys(false),
        }
    }

    /// Order-independent equality.
    pub fn is_similar(&self, other: &AttributeValue) -> bool {
        match (self, other) {
            (AttributeValue::Tokens(a), AttributeValue::Tokens(b)) => a.is_similar(b),
            (AttributeValue::Styles(a), AttributeValue::Styles(b)) => a.is_similar(b),
            (a, b) => !a.is_structured() && !b.is_structured() && a.to_string() == b.to_string(),
        }
    }

    /// Whether `other` can be merged in without overwriting anything.
    pub fn can_merge_from(&self, other: &AttributeValue) -> bool {
        match (self, other) {
            (AttributeValue::Tokens(a), AttributeValue::Tokens(b)) => a.can_merge_from(b),
            (AttributeValue::Styles(a), AttributeValue::Styles(b)) => a.can_merge_from(b),
            (a, b) => a.to_string() == b.to_string(),
        }
    }

    /// Whether everything in `other` is contained here.
    pub fn is_matching(&self, other: &AttributeValue) -> bool {
        match (self, other) {
            (AttributeValue::Tokens(a), AttributeValue::Tokens(b)) => a.is_matching(b),
            (AttributeValue::Styles(a), AttributeValue::Styles(b)) => a.is_matching(b),
            (a, b) => a.to_string() == b.to_string(),
        }
    }

    /// Merge `other` in. Mismatched kinds overwrite.
    pub fn merge_from(&mut self, other: &AttributeValue) {
        match (self, other) {
            (AttributeValue::Tokens(a), AttributeValue::Tokens(b)) => a.merge_from(b),
            (AttributeValue::Styles(a), AttributeValue::Styles(b)) => a.merge_from(b),
            (this, other) => *this = other.clone(),
        }
    }

    /// Drop the tokens or styles `other` holds. Returns whether anything changed.
    pub fn subtract(&mut self, other: &AttributeValue) -> bool {
        match self {
            AttributeValue::Plain(_) => false,
            AttributeValue::Tokens(tokens) => tokens.remove(other.keys()),
            AttributeValue::Styles(styles) => styles.remove(other.keys()),
        }
    }

    /// Tokens (or style names) matching the patterns. Plain values never have tokens.
    pub fn tokens_match(
        &self,
        token_pattern: &PatternValue,
        value_pattern: &PatternValue,
    ) -> Option<Vec<String>> {
        match self {
            AttributeValue::Plain(_) => None,
            AttributeValue::Tokens(tokens) => tokens.tokens_match(token_pattern),
            AttributeValue::Styles(styles) => styles.tokens_match(token_pattern, value_pattern),
        }
    }

    /// Sub-units a converter may consume: `None` stands for the whole plain value.
    pub fn consumables(&self, token: Option<&str>) -> Vec<Option<String>> {
        match self {
            AttributeValue::Plain(_) => vec![None],
            AttributeValue::Tokens(tokens) => {
                tokens.consumables(token).into_iter().map(Some).collect()
            }
            AttributeValue::Styles(styles) => {
                styles.consumables(token).into_iter().map(Some).collect()
            }
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Plain(value) => f.write_str(value),
            AttributeValue::Tokens(tokens) => fmt::Display::fmt(tokens, f),
            AttributeValue::Styles(styles) => fmt::Display::fmt(styles, f),
        }
    }
}

/// Value handed to constructors and `set_attribute`.
///
/// Converted into an [`AttributeValue`] according to the element name and
/// attribute key. `Null` removes the key.
#[derive(Debug, Clone)]
pub enum AttributeInput {
    Null,
    Text(String),
    Tokens(Vec<String>),
    Styles(Vec<(String, String)>),
    TokenList(TokenList),
    StylesMap(StylesMap),
}

impl AttributeInput {
    /// A single `property: value` style pair.
    pub fn style(property: impl Into<String>, value: impl Into<String>) -> Self {
        AttributeInput::Styles(vec![(property.into(), value.into())])
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeInput::Null)
    }

    /// String form, as a plain attribute would store it.
    pub fn to_text(&self) -> String {
        match self {
            AttributeInput::Null => String::new(),
            AttributeInput::Text(text) => text.clone(),
            AttributeInput::Tokens(tokens) => tokens.join(" "),
            AttributeInput::Styles(styles) => styles
                .iter()
                .map(|(name, value)| format!("{name}:{value};"))
                .collect(),
            AttributeInput::TokenList(tokens) => tokens.to_string(),
            AttributeInput::StylesMap(styles) => styles.to_string(),
        }
    }

    /// Fresh token list. An existing list is deep-copied, anything else parsed.
    pub fn to_token_list(&self) -> TokenList {
        match self {
            AttributeInput::TokenList(tokens) => tokens.clone(),
            AttributeInput::Tokens(tokens) => {
                let mut list = TokenList::new();
                list.set(tokens);
                list
            }
            other => TokenList::parse(&other.to_text()),
        }
    }

    /// Fresh styles map. An existing map is deep-copied, anything else parsed.
    pub fn to_styles_map(&self, processor: &Rc<StylesProcessor>) -> StylesMap {
        match self {
            AttributeInput::StylesMap(styles) => styles.clone(),
            AttributeInput::Styles(pairs) => {
                let mut map = StylesMap::new(Rc::clone(processor));
                map.set_many(pairs.iter().map(|(name, value)| (name, value)));
                map
            }
            other => StylesMap::parse(&other.to_text(), Rc::clone(processor)),
        }
    }
}

impl From<&str> for AttributeInput {
    fn from(value: &str) -> Self {
        AttributeInput::Text(value.to_string())
    }
}

impl From<String> for AttributeInput {
    fn from(value: String) -> Self {
        AttributeInput::Text(value)
    }
}

impl From<&String> for AttributeInput {
    fn from(value: &String) -> Self {
        AttributeInput::Text(value.clone())
    }
}

impl From<Vec<String>> for AttributeInput {
    fn from(tokens: Vec<String>) -> Self {
        AttributeInput::Tokens(tokens)
    }
}

impl From<Vec<&str>> for AttributeInput {
    fn from(tokens: Vec<&str>) -> Self {
        AttributeInput::Tokens(tokens.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for AttributeInput {
    fn from(tokens: [&str; N]) -> Self {
        AttributeInput::Tokens(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl From<Vec<(&str, &str)>> for AttributeInput {
    fn from(styles: Vec<(&str, &str)>) -> Self {
        AttributeInput::Styles(
            styles
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        )
    }
}

impl From<TokenList> for AttributeInput {
    fn from(tokens: TokenList) -> Self {
        AttributeInput::TokenList(tokens)
    }
}

impl From<StylesMap> for AttributeInput {
    fn from(styles: StylesMap) -> Self {
        AttributeInput::StylesMap(styles)
    }
}

impl From<&AttributeValue> for AttributeInput {
    fn from(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Plain(text) => AttributeInput::Text(text.clone()),
            AttributeValue::Tokens(tokens) => AttributeInput::TokenList(tokens.clone()),
            AttributeValue::Styles(styles) => AttributeInput::StylesMap(styles.clone()),
        }
    }
}

impl<T: Into<AttributeInput>> From<Option<T>> for AttributeInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttributeInput::Null, Into::into)
    }
}

macro_rules! impl_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttributeInput {
                fn from(value: $ty) -> Self {
                    AttributeInput::Text(value.to_string())
                }
            }
        )*
    };
}

impl_from_display!(bool, char, i32, i64, u32, u64, usize, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_string_inputs_are_coerced() {
        assert_eq!(AttributeInput::from(3).to_text(), "3");
        assert_eq!(AttributeInput::from(true).to_text(), "true");
        assert!(AttributeInput::from(None::<&str>).is_null());
        assert_eq!(AttributeInput::from(vec!["a", "b"]).to_text(), "a b");
        assert_eq!(AttributeInput::style("color", "red").to_text(), "color:red;");
    }

    #[test]
    fn test_structured_inputs_are_deep_copied() {
        let original = TokenList::parse("a b");
        let input = AttributeInput::from(original.clone());

        let mut copy = input.to_token_list();
        copy.set(["c"]);

        assert_eq!(original.to_string(), "a b");
        assert_eq!(copy.to_string(), "a b c");
    }

    #[test]
    fn test_plain_and_structured_are_never_similar() {
        let plain = AttributeValue::Plain("a".to_string());
        let tokens = AttributeValue::Tokens(TokenList::parse("a"));

        assert!(!plain.is_similar(&tokens));
        assert!(plain.is_similar(&AttributeValue::Plain("a".to_string())));
    }

    #[test]
    fn test_subtract_removes_tokens() {
        let mut value = AttributeValue::Tokens(TokenList::parse("a b c"));
        assert!(value.subtract(&AttributeValue::Tokens(TokenList::parse("a c"))));
        assert_eq!(value.to_string(), "b");
    }
}
