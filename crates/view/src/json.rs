//! JSON view descriptions
//!
//! Builds view trees from a compact JSON form, used for parsed input and
//! for fixtures:
//!
//! ```json
//! [
//!   "leading text",
//!   {
//!     "name": "p",
//!     "kind": "container",
//!     "attributes": { "class": ["a", "b"], "style": { "color": "red" }, "title": "t" },
//!     "children": ["foo", { "name": "b", "kind": "attribute", "priority": 5 }]
//!   }
//! ]
//! ```
//!
//! Strings are text nodes, objects are elements, arrays are document
//! fragments. `kind` defaults to `container`.

use crate::attribute::AttributeInput;
use crate::document::ViewDocument;
use crate::error::{Result, ViewError};
use crate::node::ChildInput;
use crate::types::{ElementKind, NodeId};
use crate::writer::UpcastWriter;
use serde_json::{Map, Value};

/// Parse a JSON string into a detached subtree of `document`.
pub fn parse_str(document: &mut ViewDocument, text: &str) -> Result<NodeId> {
    let value: Value = serde_json::from_str(text)?;
    let mut writer = UpcastWriter::new(document);
    parse(&mut writer, &value)
}

/// Build the subtree described by `value`, returns its root.
pub fn parse(writer: &mut UpcastWriter<'_>, value: &Value) -> Result<NodeId> {
    match value {
        Value::String(text) => Ok(writer.create_text(text.as_str())),
        Value::Array(items) => {
            let children = parse_children(writer, items)?;
            writer.create_document_fragment(children)
        }
        Value::Object(object) => parse_element(writer, object),
        other => Err(ViewError::InvalidDescription(format!(
            "expected string, array or object, got {}",
            other
        ))),
    }
}

fn parse_children(writer: &mut UpcastWriter<'_>, items: &[Value]) -> Result<Vec<ChildInput>> {
    items
        .iter()
        .map(|item| parse(writer, item).map(ChildInput::from))
        .collect()
}

fn parse_element(writer: &mut UpcastWriter<'_>, object: &Map<String, Value>) -> Result<NodeId> {
    let name = object
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ViewError::InvalidDescription("element without 'name'".to_string()))?;

    let mut kind = match object.get("kind").and_then(Value::as_str) {
        Some(kind) => ElementKind::from_name(kind).ok_or_else(|| {
            ViewError::InvalidDescription(format!("unknown element kind '{}'", kind))
        })?,
        None => ElementKind::Container,
    };

    if let ElementKind::Attribute { priority, id } = &mut kind {
        if let Some(value) = object.get("priority").and_then(Value::as_i64) {
            *priority = i32::try_from(value).map_err(|_| {
                ViewError::InvalidDescription(format!("priority {} of <{}> is out of range", value, name))
            })?;
        }
        if let Some(value) = object.get("id").and_then(Value::as_str) {
            *id = Some(value.to_string());
        }
    }

    let attributes = match object.get("attributes") {
        Some(Value::Object(attributes)) => attributes
            .iter()
            .map(|(key, value)| Ok((key.clone(), attribute_input(key, value)?)))
            .collect::<Result<Vec<_>>>()?,
        Some(other) => {
            return Err(ViewError::InvalidDescription(format!(
                "'attributes' of <{}> must be an object, got {}",
                name, other
            )))
        }
        None => Vec::new(),
    };

    let children = match object.get("children") {
        Some(Value::Array(items)) => parse_children(writer, items)?,
        Some(other) => vec![ChildInput::from(parse(writer, other)?)],
        None => Vec::new(),
    };

    writer.create_element_of_kind(name, kind, attributes, children)
}

fn attribute_input(key: &str, value: &Value) -> Result<AttributeInput> {
    Ok(match value {
        Value::Null => AttributeInput::Null,
        Value::String(text) => AttributeInput::Text(text.clone()),
        Value::Bool(_) | Value::Number(_) => AttributeInput::Text(value.to_string()),
        Value::Array(items) => AttributeInput::Tokens(items.iter().map(value_text).collect()),
        Value::Object(styles) if key == "style" => AttributeInput::Styles(
            styles
                .iter()
                .map(|(property, value)| (property.clone(), value_text(value)))
                .collect(),
        ),
        Value::Object(_) => {
            return Err(ViewError::InvalidDescription(format!(
                "attribute '{}' cannot take an object",
                key
            )))
        }
    })
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::ViewSerializer;
    use serde_json::json;

    #[test]
    fn test_parse_element_tree() {
        let mut doc = ViewDocument::new();
        let description = json!({
            "name": "p",
            "attributes": { "class": ["a", "b"], "style": { "color": "red" }, "title": "t" },
            "children": ["foo", { "name": "b", "kind": "attribute", "priority": 5 }]
        });

        let mut writer = UpcastWriter::new(&mut doc);
        let p = parse(&mut writer, &description).unwrap();

        let element = doc.element(p).unwrap();
        assert!(element.has_class(&["a", "b"]));
        assert_eq!(element.get_style("color").as_deref(), Some("red"));
        assert_eq!(element.get_attribute("title").as_deref(), Some("t"));

        let b = doc.child(p, 1).unwrap().unwrap();
        assert_eq!(doc.element(b).unwrap().priority(), Some(5));
        assert_eq!(
            ViewSerializer::new().serialize(&doc, p).unwrap(),
            "<p class=\"a b\" style=\"color:red;\" title=\"t\">foo<b></b></p>"
        );
    }

    #[test]
    fn test_parse_fragment() {
        let mut doc = ViewDocument::new();
        let fragment = parse_str(&mut doc, r#"["a", {"name": "br", "kind": "empty"}]"#).unwrap();

        assert!(doc.get(fragment).unwrap().is_document_fragment());
        assert_eq!(doc.child_count(fragment).unwrap(), 2);
    }

    #[test]
    fn test_invalid_descriptions() {
        let mut doc = ViewDocument::new();
        assert!(matches!(
            parse_str(&mut doc, r#"{"kind": "container"}"#),
            Err(ViewError::InvalidDescription(_))
        ));
        assert!(matches!(
            parse_str(&mut doc, r#"{"name": "p", "kind": "widget"}"#),
            Err(ViewError::InvalidDescription(_))
        ));
        assert!(matches!(
            parse_str(&mut doc, r#"{"name": "br", "kind": "empty", "children": ["x"]}"#),
            Err(ViewError::ChildrenNotAllowed { .. })
        ));
        assert!(matches!(
            parse_str(&mut doc, r#"{"name": "b", "kind": "attribute", "priority": 4294967301}"#),
            Err(ViewError::InvalidDescription(_))
        ));
        assert!(matches!(parse_str(&mut doc, "{"), Err(ViewError::ParseError(_))));
        assert!(matches!(parse_str(&mut doc, "42"), Err(ViewError::InvalidDescription(_))));
    }
}
