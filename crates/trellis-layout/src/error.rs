//! Layout Errors

use crate::layout_tree::NodeId;

/// Structural tree edit error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Node {0} does not exist")]
    NodeNotFound(NodeId),

    #[error("Node {child} already has parent {parent}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { child: NodeId, parent: NodeId },

    #[error("Appending {child} to {parent} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },
}
