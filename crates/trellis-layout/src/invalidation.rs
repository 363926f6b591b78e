//! Invalidation
//!
//! Dirty tracking for incremental relayout.
//!
//! Every style edit marks the edited box dirty, and every child insertion or
//! removal marks the parent dirty. A box re-runs its layout strategy only when
//! it, or one of its direct children, is dirty. With
//! [`DirtyPropagation::Ancestors`] an edit additionally flags every ancestor so
//! that changes deep in the tree are never skipped.

use crate::layout_tree::{LayoutTree, NodeId};
use serde::{Deserialize, Serialize};

/// How far a style edit reaches up the tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirtyPropagation {
    /// Only the edited box is marked. A box more than one level below the
    /// layout root can be missed when nothing between them changed.
    #[default]
    Shallow,
    /// The edited box is marked and every ancestor is flagged as having a
    /// dirty descendant.
    Ancestors,
}

/// Counters for the most recent layout pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Boxes whose own width/height were recomputed
    pub boxes_measured: u64,
    /// Strategy invocations
    pub strategies_run: u64,
    /// Boxes whose cached arrangement was kept
    pub strategies_skipped: u64,
    /// Absolute, fixed and sticky boxes positioned
    pub out_of_flow_positioned: u64,
}

impl LayoutStats {
    /// Total boxes visited by the layout step
    pub fn boxes_visited(&self) -> u64 {
        self.strategies_run + self.strategies_skipped
    }
}

impl LayoutTree {
    /// Mark a box dirty according to the configured propagation.
    pub(crate) fn mark_dirty(&mut self, id: NodeId) {
        let propagation = self.config().dirty_propagation;
        let mut parent = match self.node_mut(id) {
            Some(node) => {
                node.dirty = true;
                node.parent
            }
            None => return,
        };

        if propagation != DirtyPropagation::Ancestors {
            return;
        }

        while let Some(node) = parent.and_then(|ancestor| self.node_mut(ancestor)) {
            node.has_dirty_descendant = true;
            parent = node.parent;
        }
    }

    /// Whether a box has to re-run its strategy.
    pub(crate) fn needs_layout(&self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        node.dirty
            || node.has_dirty_descendant
            || node
                .children
                .iter()
                .any(|&child| self.get(child).is_some_and(|c| c.dirty))
    }
}
