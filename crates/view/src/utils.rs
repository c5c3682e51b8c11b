//! Utility functions for attribute text processing

/// Split a whitespace separated token string (`class`, `rel`).
pub fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Parse a `style` attribute into `(name, value)` declarations.
///
/// Semicolons and colons inside parentheses or quotes do not split, so
/// `background:url("a;b.png")` stays one declaration. Property names are
/// lowercased, both sides are trimmed, and declarations with an empty name
/// or value are dropped.
pub fn parse_style_declarations(text: &str) -> Vec<(String, String)> {
    let mut declarations = Vec::new();

    for chunk in split_top_level(text, |c| c == ';') {
        let Some(colon) = find_top_level(chunk, ':') else {
            continue;
        };

        let name = chunk[..colon].trim().to_ascii_lowercase();
        let value = chunk[colon + 1..].trim();

        if name.is_empty() || value.is_empty() {
            continue;
        }

        declarations.push((name, value.to_string()));
    }

    declarations
}

/// Split a CSS value on top-level whitespace: `1px rgb(0, 0, 0)` gives two parts.
pub fn split_value_parts(value: &str) -> Vec<&str> {
    split_top_level(value, char::is_whitespace)
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect()
}

/// Escape a value for use inside a double-quoted attribute.
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape text content.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn split_top_level(text: &str, is_separator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (idx, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                c if depth == 0 && is_separator(c) => {
                    parts.push(&text[start..idx]);
                    start = idx + c.len_utf8();
                }
                _ => {}
            },
        }
    }

    parts.push(&text[start..]);
    parts
}

fn find_top_level(text: &str, needle: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (idx, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                c if c == needle && depth == 0 => return Some(idx),
                _ => {}
            },
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style_declarations() {
        let parsed = parse_style_declarations("Color: red; background:url(\"a;b.png\");;margin:");
        assert_eq!(
            parsed,
            vec![
                ("color".to_string(), "red".to_string()),
                ("background".to_string(), "url(\"a;b.png\")".to_string()),
            ]
        );
    }

    #[test]
    fn test_split_value_parts() {
        assert_eq!(
            split_value_parts("1px  rgb(0, 0, 0) solid"),
            vec!["1px", "rgb(0, 0, 0)", "solid"]
        );
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_attribute("a\"b&c"), "a&quot;b&amp;c");
        assert_eq!(escape_text("<p>"), "&lt;p&gt;");
    }
}
