//! Error types for bookmark conversion

use thiserror::Error;
use view::ViewError;

pub type Result<T> = std::result::Result<T, BookmarkError>;

#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("Invalid bookmark id: {0:?}")]
    InvalidId(String),

    #[error("View error: {0}")]
    View(#[from] ViewError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
