//! Layout Strategies
//!
//! A box arranges its children with one of two algorithms, chosen by its
//! display kind.

use crate::layout_tree::{LayoutTree, NodeId};
use crate::style::Display;
use crate::{block, flex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Child arrangement algorithm of a box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutStrategy {
    /// Block stacking and inline runs
    #[default]
    NormalFlow,
    /// Flexbox
    Flex,
}

impl LayoutStrategy {
    /// Strategy for a display kind. `Display::None` boxes are never arranged.
    pub fn for_display(display: Display) -> Self {
        if display.is_flex_container() {
            LayoutStrategy::Flex
        } else {
            LayoutStrategy::NormalFlow
        }
    }

    /// Arrange the children of `id`.
    ///
    /// The box's own width/height have already been computed. The strategy
    /// may still resolve an auto size from its children.
    pub(crate) fn layout(self, tree: &mut LayoutTree, id: NodeId, available_width: f32, available_height: f32) {
        if let Some(node) = tree.node_mut(id) {
            node.out_of_flow.clear();
        }

        tracing::trace!(node = %id, strategy = %self, available_width, available_height, "running strategy");

        match self {
            LayoutStrategy::NormalFlow => block::layout_normal_flow(tree, id, available_width, available_height),
            LayoutStrategy::Flex => flex::layout_flex(tree, id, available_width, available_height),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutStrategy::NormalFlow => "normal-flow",
            LayoutStrategy::Flex => "flex",
        }
    }
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
