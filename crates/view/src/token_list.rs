//! Ordered set of whitespace separated tokens
//!
//! Backs `class` on every element and `rel` on anchors.

use crate::matcher::PatternValue;
use crate::utils::split_tokens;
use ahash::RandomState;
use indexmap::IndexSet;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct TokenList {
    tokens: IndexSet<String, RandomState>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whitespace separated string.
    pub fn parse(text: &str) -> Self {
        let mut list = Self::new();
        list.set_to(text);
        list
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    pub fn has(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Tokens in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Replace the whole content with the tokens of `text`.
    pub fn set_to(&mut self, text: &str) {
        self.tokens.clear();
        self.tokens.extend(split_tokens(text).map(str::to_string));
    }

    /// Add tokens. Each item may itself hold several whitespace separated tokens.
    pub fn set<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in tokens {
            self.tokens
                .extend(split_tokens(item.as_ref()).map(str::to_string));
        }
    }

    /// Remove tokens, returns whether anything was removed.
    pub fn remove<I, S>(&mut self, tokens: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removed = false;
        for item in tokens {
            for token in split_tokens(item.as_ref()) {
                removed |= self.tokens.shift_remove(token);
            }
        }
        removed
    }

    /// Same tokens, in any order.
    pub fn is_similar(&self, other: &TokenList) -> bool {
        self.size() == other.size() && other.keys().all(|token| self.has(token))
    }

    /// Token sets never conflict.
    pub fn can_merge_from(&self, _other: &TokenList) -> bool {
        true
    }

    pub fn merge_from(&mut self, other: &TokenList) {
        self.set(other.keys());
    }

    /// Whether every token of `other` is present here.
    pub fn is_matching(&self, other: &TokenList) -> bool {
        other.keys().all(|token| self.has(token))
    }

    /// Tokens matching `pattern`, or `None` when nothing matches.
    pub fn tokens_match(&self, pattern: &PatternValue) -> Option<Vec<String>> {
        let matched: Vec<String> = self
            .keys()
            .filter(|token| pattern.is_match(token))
            .map(str::to_string)
            .collect();

        if matched.is_empty() {
            None
        } else {
            Some(matched)
        }
    }

    /// Consumable units: the named token, or all tokens.
    pub fn consumables(&self, token: Option<&str>) -> Vec<String> {
        match token {
            Some(token) => vec![token.to_string()],
            None => self.keys().map(str::to_string).collect(),
        }
    }

    /// Tokens sorted lexicographically, the order-independent form.
    pub fn sorted(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.keys().collect();
        tokens.sort_unstable();
        tokens
    }
}

impl fmt::Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, token) in self.tokens.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token)?;
        }
        Ok(())
    }
}
