//! Bookmark feature configuration
//!
//! Read from the `bookmark` key of an editor configuration:
//!
//! ```json
//! { "bookmark": { "toolbar": ["editBookmark"], "enableNonEmptyAnchorConversion": false } }
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TOOLBAR: &[&str] = &["bookmarkPreview", "|", "editBookmark", "removeBookmark"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookmarkConfig {
    /// Items of the balloon toolbar shown over a bookmark.
    pub toolbar: Vec<String>,
    /// Convert anchors that have an `id`, no `href` and some content.
    /// The bookmark is placed before the kept content.
    pub enable_non_empty_anchor_conversion: bool,
}

impl Default for BookmarkConfig {
    fn default() -> Self {
        Self {
            toolbar: DEFAULT_TOOLBAR.iter().map(|s| s.to_string()).collect(),
            enable_non_empty_anchor_conversion: true,
        }
    }
}

impl BookmarkConfig {
    /// Extract the `bookmark` section of an editor config, defaults when absent.
    pub fn from_editor_config(config: &Value) -> Result<Self> {
        match config.get("bookmark") {
            Some(section) => Ok(serde_json::from_value(section.clone())?),
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Value = serde_json::from_str(text)?;
        Self::from_editor_config(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = BookmarkConfig::from_editor_config(&json!({})).unwrap();
        assert!(config.enable_non_empty_anchor_conversion);
        assert_eq!(
            config.toolbar,
            vec!["bookmarkPreview", "|", "editBookmark", "removeBookmark"]
        );
    }

    #[test]
    fn test_partial_section() {
        let config = BookmarkConfig::from_json(
            r#"{"bookmark": {"enableNonEmptyAnchorConversion": false}}"#,
        )
        .unwrap();
        assert!(!config.enable_non_empty_anchor_conversion);
        assert_eq!(config.toolbar.len(), 4);
    }

    #[test]
    fn test_invalid_section() {
        assert!(BookmarkConfig::from_editor_config(&json!({"bookmark": {"toolbar": 3}})).is_err());
    }
}
