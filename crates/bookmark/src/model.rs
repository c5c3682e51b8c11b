//! Bookmark model node

use crate::error::{BookmarkError, Result};
use serde::{Deserialize, Serialize};

/// A bookmark id is usable as an anchor target: non-empty, no whitespace.
pub fn is_bookmark_id_valid(id: &str) -> bool {
    !id.is_empty() && !id.chars().any(char::is_whitespace)
}

/// Inline model element marking a link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "BookmarkRecord")]
pub struct BookmarkModel {
    bookmark_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookmarkRecord {
    bookmark_id: String,
}

impl TryFrom<BookmarkRecord> for BookmarkModel {
    type Error = BookmarkError;

    fn try_from(record: BookmarkRecord) -> Result<Self> {
        Self::new(record.bookmark_id)
    }
}

impl BookmarkModel {
    pub fn new(bookmark_id: impl Into<String>) -> Result<Self> {
        let bookmark_id = bookmark_id.into();
        if !is_bookmark_id_valid(&bookmark_id) {
            return Err(BookmarkError::InvalidId(bookmark_id));
        }
        Ok(Self { bookmark_id })
    }

    pub fn bookmark_id(&self) -> &str {
        &self.bookmark_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_validation() {
        assert!(is_bookmark_id_valid("foo"));
        assert!(is_bookmark_id_valid("foo-bar_1"));
        assert!(!is_bookmark_id_valid(""));
        assert!(!is_bookmark_id_valid("foo bar"));
        assert!(!is_bookmark_id_valid("foo\tbar"));

        assert!(matches!(BookmarkModel::new(" "), Err(BookmarkError::InvalidId(_))));
        assert_eq!(BookmarkModel::new("foo").unwrap().bookmark_id(), "foo");
    }

    #[test]
    fn test_serde_shape() {
        let model = BookmarkModel::new("foo").unwrap();
        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            serde_json::json!({"bookmarkId": "foo"})
        );
        assert!(serde_json::from_str::<BookmarkModel>(r#"{"bookmarkId": "a b"}"#).is_err());
    }
}
