//! Editing View Tree Library
//!
//! The editing-facing tree sitting between a data model and rendered
//! output: elements with structured attributes (token sets, style maps),
//! writer-mediated mutation, change notification and structural matching.
//!
//! ## Core Design
//!
//! ```text
//! Writer → ViewDocument (fires change) → ViewArena (owned nodes)
//!                 ↓                            ↓
//!          ChangeListener                NodeId (u32)
//! ```
//!
//! - Nodes live in an arena and refer to each other by index. The parent
//!   link is a back-reference, cleared on removal.
//! - Attribute values are a closed variant: plain string, token set or
//!   style map.
//! - The styles processor is passed to elements at construction, there is
//!   no global state.

pub mod arena;
pub mod attribute;
pub mod change;
pub mod document;
pub mod element;
pub mod error;
pub mod json;
pub mod matcher;
pub mod node;
pub mod serializer;
pub mod styles;
pub mod token_list;
pub mod types;
pub mod utils;
pub mod writer;

pub use arena::ViewArena;
pub use attribute::{AttributeInput, AttributeValue};
pub use change::{Change, ChangeListener, ChangeLog};
pub use document::ViewDocument;
pub use element::{Consumables, Element, FillerOffsetFn, PropertyKey};
pub use error::{Result, ViewError};
pub use matcher::{ElementPattern, MatchResult, Matcher, MatcherMatch, Pattern, PatternValue, PropertyPattern};
pub use node::{ChildInput, NodeData, TextProxy, ViewNode};
pub use serializer::{SerializerConfig, ViewSerializer};
pub use styles::{StylesMap, StylesProcessor};
pub use token_list::TokenList;
pub use types::*;
pub use writer::{DowncastWriter, ElementOptions, UpcastWriter, NO_ATTRIBUTES};
