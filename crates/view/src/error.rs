//! Error types for view tree operations
//!
//! Failed matches, absent attributes and refused merges are `bool`/`Option`
//! returns. Errors cover structural misuse of the tree and bad input.

use crate::types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ViewError>;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Element <{name}> cannot contain children")]
    ChildrenNotAllowed { name: String },

    #[error("Child range {index}..{end} out of bounds for node with {len} children")]
    OutOfRange { index: usize, end: usize, len: usize },

    #[error("Cannot insert node {child} into its own subtree")]
    HierarchyRequest { child: NodeId },

    #[error("Node {node} is still attached to {parent}")]
    StillAttached { node: NodeId, parent: NodeId },

    #[error("Invalid view description: {0}")]
    InvalidDescription(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}
