//! Bookmark conversion between the model node and the view
//!
//! Data output is an empty anchor carrying the id. Editing output is a
//! non-editable anchor widget holding a UI icon. Parsed input turns
//! anchors with an `id` and no `href` back into bookmarks.

use crate::config::BookmarkConfig;
use crate::error::Result;
use crate::model::BookmarkModel;
use crate::widget::to_widget;
use view::{DowncastWriter, Element, ElementOptions, Matcher, NodeId, Pattern, ViewDocument};

pub const BOOKMARK_CLASS: &str = "ck-bookmark";
pub const BOOKMARK_ICON_CLASS: &str = "ck-bookmark__icon";

/// Result of converting a view anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upcast {
    /// Childless anchor, replaced by the bookmark.
    Bookmark(BookmarkModel),
    /// Anchor with content: the bookmark goes before the kept children.
    BookmarkBeforeContent {
        bookmark: BookmarkModel,
        children: Vec<NodeId>,
    },
}

/// `<a id="...">` with no children, for the data pipeline.
pub fn downcast_data(writer: &mut DowncastWriter<'_>, bookmark: &BookmarkModel) -> Result<NodeId> {
    let anchor = writer.create_empty_element(
        "a",
        [("id", bookmark.bookmark_id())],
        ElementOptions::default(),
    )?;
    tracing::debug!("[Bookmark] Data downcast of {:?}", bookmark.bookmark_id());
    Ok(anchor)
}

/// Anchor widget with an icon, for the editing pipeline.
pub fn downcast_editing(writer: &mut DowncastWriter<'_>, bookmark: &BookmarkModel) -> Result<NodeId> {
    let anchor = writer.create_container_element(
        "a",
        [("id", bookmark.bookmark_id()), ("class", BOOKMARK_CLASS)],
    );
    let icon = writer.create_ui_element("span", [("class", BOOKMARK_ICON_CLASS)]);
    writer.append(anchor, vec![icon.into()])?;

    let label = format!("{} bookmark widget", bookmark.bookmark_id());
    to_widget(writer, anchor, &label)?;

    tracing::debug!("[Bookmark] Editing downcast of {:?}", bookmark.bookmark_id());
    Ok(anchor)
}

/// An anchor with an `id` and no `href`. Childless unless non-empty
/// conversion is enabled.
pub fn is_bookmark_element(element: &Element, config: &BookmarkConfig) -> bool {
    element.name() == "a"
        && element.has_attribute("id", None)
        && !element.has_attribute("href", None)
        && (element.is_empty() || config.enable_non_empty_anchor_conversion)
}

/// Matcher selecting bookmark anchors.
pub fn bookmark_matcher(config: &BookmarkConfig) -> Matcher {
    let config = config.clone();
    Matcher::with_patterns([Pattern::predicate(move |element| {
        is_bookmark_element(element, &config)
    })])
}

/// Convert a view node into a bookmark, if it is one.
pub fn upcast(document: &ViewDocument, node_id: NodeId, config: &BookmarkConfig) -> Result<Option<Upcast>> {
    let node = document.get(node_id)?;
    let Some(element) = node.as_element() else {
        return Ok(None);
    };

    if bookmark_matcher(config).match_element(element).is_none() {
        return Ok(None);
    }

    let id = element.get_attribute("id").unwrap_or_default();
    let bookmark = match BookmarkModel::new(id) {
        Ok(bookmark) => bookmark,
        Err(err) => {
            tracing::debug!("[Bookmark] Skipping anchor: {}", err);
            return Ok(None);
        }
    };

    if element.is_empty() {
        tracing::debug!("[Bookmark] Upcast {:?}", bookmark.bookmark_id());
        return Ok(Some(Upcast::Bookmark(bookmark)));
    }

    tracing::debug!(
        "[Bookmark] Upcast {:?} before {} children",
        bookmark.bookmark_id(),
        element.child_count()
    );
    Ok(Some(Upcast::BookmarkBeforeContent {
        bookmark,
        children: element.children().to_vec(),
    }))
}
