//! Arena-based view tree storage
//!
//! Nodes live in one `Vec` and refer to each other by `NodeId`. There is no
//! `Rc` between nodes, so parent links cannot form ownership cycles.
//!
//! ```text
//! Arena: Vec<Option<ViewNode>>
//!        [Node0][Node1][ free ][Node3]...
//!         ↑ 4-byte index, not a pointer
//! ```
//!
//! Removing a node from its parent only detaches it, the caller may still
//! insert it elsewhere. A detached subtree is freed with [`ViewArena::release`];
//! its slots go on a free list and their ids are handed out again.

use crate::error::{Result, ViewError};
use crate::node::ViewNode;
use crate::types::NodeId;

#[derive(Debug, Default)]
pub struct ViewArena {
    nodes: Vec<Option<ViewNode>>,
    free: Vec<NodeId>,
}

impl ViewArena {
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(64),
            free: Vec::new(),
        }
    }

    /// Add a node to the arena, returns its ID. Freed slots are reused first.
    pub fn add_node(&mut self, node: ViewNode) -> NodeId {
        if let Some(node_id) = self.free.pop() {
            self.nodes[node_id as usize] = Some(node);
            return node_id;
        }

        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(Some(node));
        node_id
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&ViewNode> {
        self.nodes
            .get(node_id as usize)
            .and_then(Option::as_ref)
            .ok_or(ViewError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut ViewNode> {
        self.nodes
            .get_mut(node_id as usize)
            .and_then(Option::as_mut)
            .ok_or(ViewError::NodeNotFound(node_id))
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots, live or free. Only grows when no freed slot is left.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| i as NodeId)
    }

    /// Free a detached node and its whole subtree. Returns the number of
    /// freed nodes.
    pub fn release(&mut self, node_id: NodeId) -> Result<usize> {
        if let Some(parent) = self.get(node_id)?.parent {
            return Err(ViewError::StillAttached { node: node_id, parent });
        }

        let mut subtree = Vec::new();
        self.traverse_df(node_id, |id, _| {
            subtree.push(id);
            Ok(())
        })?;

        for &id in &subtree {
            self.nodes[id as usize] = None;
        }
        self.free.extend(subtree.iter().rev());

        Ok(subtree.len())
    }

    /// Walk parent links upwards, nearest ancestor first.
    pub fn ancestors(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let mut ancestors = Vec::new();
        let mut current = self.get(node_id)?.parent;

        while let Some(id) = current {
            ancestors.push(id);
            current = self.get(id)?.parent;
        }

        Ok(ancestors)
    }

    /// Whether `ancestor` is `node_id` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, node_id: NodeId) -> Result<bool> {
        Ok(node_id == ancestor || self.ancestors(node_id)?.contains(&ancestor))
    }

    /// Traverse a subtree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(NodeId, &ViewNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node_id, node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children().iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Find nodes of a subtree matching predicate, in document order
    pub fn find<F>(&self, start_id: NodeId, predicate: F) -> Result<Vec<NodeId>>
    where
        F: Fn(&ViewNode) -> bool,
    {
        let mut found = Vec::new();
        self.traverse_df(start_id, |node_id, node| {
            if predicate(node) {
                found.push(node_id);
            }
            Ok(())
        })?;
        Ok(found)
    }
}
