//! Bookmark Plugin
//!
//! Named link targets inside content. A bookmark lives in the model as
//! an inline node carrying an id and is persisted as an anchor with that
//! `id` and no `href`.
//!
//! ```text
//! BookmarkModel ──downcast_data────→ <a id="foo"></a>
//!               ──downcast_editing─→ <a id="foo" class="ck-bookmark ck-widget"><span/></a>
//! <a id="foo"> ──upcast────────────→ BookmarkModel
//! ```

pub mod config;
pub mod conversion;
pub mod error;
pub mod model;
pub mod widget;

pub use config::BookmarkConfig;
pub use conversion::{downcast_data, downcast_editing, is_bookmark_element, upcast, Upcast};
pub use error::{BookmarkError, Result};
pub use model::{is_bookmark_id_valid, BookmarkModel};
pub use widget::{is_widget, to_widget};
