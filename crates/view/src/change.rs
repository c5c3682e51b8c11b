//! Change notifications
//!
//! Listeners are told about a mutation BEFORE it is applied, with read
//! access to the document, so they can snapshot the prior state.
//!
//! Same shape as a watchdog manager: a `Vec<Box<dyn ChangeListener>>`
//! dispatched in registration order.

use crate::document::ViewDocument;
use crate::types::{ChangeKind, NodeId};
use std::cell::RefCell;
use std::rc::Rc;

/// Observer of view mutations (renderer, differ, tests).
pub trait ChangeListener {
    /// Human-readable name for logging
    fn name(&self) -> &str;

    /// Called for EVERY mutation, before the state changes.
    fn on_change(&mut self, kind: ChangeKind, node: NodeId, document: &ViewDocument);
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    pub node: NodeId,
    /// Identity of the element (or text data) as it was before the change.
    pub before: Option<String>,
}

/// Listener recording every change. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    entries: Rc<RefCell<Vec<Change>>>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Change> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl ChangeListener for ChangeLog {
    fn name(&self) -> &str {
        "ChangeLog"
    }

    fn on_change(&mut self, kind: ChangeKind, node: NodeId, document: &ViewDocument) {
        let before = document.get(node).ok().and_then(|n| {
            n.as_element()
                .map(|element| element.identity())
                .or_else(|| n.as_text().map(str::to_string))
        });

        self.entries.borrow_mut().push(Change { kind, node, before });
    }
}
