//! Positioned Layout
//!
//! Second pass of [`LayoutTree::calculate`]. Parent-local offsets become
//! tree-absolute coordinates, relative shifts are applied, and absolute,
//! fixed and sticky boxes are placed against their containing blocks.

use crate::box_model::Rect;
use crate::layout_tree::{LayoutTree, Node, NodeId};
use crate::length::Length;
use crate::style::{Display, Position};

/// Resolved insets along one axis, `None` where auto
#[derive(Debug, Clone, Copy)]
struct Insets {
    start: Option<f32>,
    end: Option<f32>,
}

impl Insets {
    fn resolve(start: Length, end: Length, reference: f32) -> Self {
        Self {
            start: start.resolve_definite(reference),
            end: end.resolve_definite(reference),
        }
    }

    /// Size between both insets when both are set
    fn stretched(self, reference: f32) -> Option<f32> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((reference - start - end).max(0.0)),
            _ => None,
        }
    }

    /// Start edge of a box of `size` inside `origin..origin + reference`.
    ///
    /// With both insets auto the box sits at the origin.
    fn place(self, origin: f32, reference: f32, size: f32) -> f32 {
        match (self.start, self.end) {
            (Some(start), _) => origin + start,
            (None, Some(end)) => origin + reference - end - size,
            (None, None) => origin,
        }
    }
}

/// Visual shift of a relatively positioned box
fn relative_shift(node: &Node, reference_width: f32, reference_height: f32) -> (f32, f32) {
    if node.position() != Position::Relative {
        return (0.0, 0.0);
    }
    let offsets = &node.style.offsets;
    (
        offsets.left.resolve_or_zero(reference_width) - offsets.right.resolve_or_zero(reference_width),
        offsets.top.resolve_or_zero(reference_height) - offsets.bottom.resolve_or_zero(reference_height),
    )
}

impl LayoutTree {
    /// Place the layout root at the origin and resolve its subtree
    pub(crate) fn place_root(&mut self, root: NodeId, available_width: f32, available_height: f32) {
        let Some(node) = self.get(root) else {
            return;
        };
        if node.display() == Display::None {
            return;
        }
        let (x, y) = relative_shift(node, available_width, available_height);
        if let Some(node) = self.node_mut(root) {
            node.layout.x = x;
            node.layout.y = y;
        }
        self.resolve_positions(root);
    }

    /// Give the in-flow children of `id` absolute coordinates, then place its
    /// out-of-flow children. `id` itself must already be resolved.
    fn resolve_positions(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (origin_x, origin_y) = (node.layout.x, node.layout.y);
        let content = self.content_rect(id);
        let children = node.children.clone();

        for child in children {
            let Some(child_node) = self.get(child) else {
                continue;
            };
            if !child_node.position().is_in_flow() || child_node.display() == Display::None {
                continue;
            }

            let (dx, dy) = relative_shift(child_node, content.width, content.height);
            let x = origin_x + child_node.local_x + dx;
            let y = origin_y + child_node.local_y + dy;
            if let Some(child_node) = self.node_mut(child) {
                child_node.layout.x = x;
                child_node.layout.y = y;
            }
            self.resolve_positions(child);
        }

        self.position_out_of_flow_children(id);
    }

    /// Lay out and place the out-of-flow children collected by the strategy of `id`
    fn position_out_of_flow_children(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.out_of_flow.is_empty() {
            return;
        }
        let out_of_flow = node.out_of_flow.clone();

        for child in out_of_flow {
            let Some(child_node) = self.get(child) else {
                continue;
            };
            let dims = child_node.style.dimensions;
            let block = self.containing_block(child, dims.position);

            let horizontal = Insets::resolve(dims.left, dims.right, block.width);
            let vertical = Insets::resolve(dims.top, dims.bottom, block.height);
            let stretch_width = horizontal.stretched(block.width);
            let stretch_height = vertical.stretched(block.height);

            self.layout_node(
                child,
                stretch_width.unwrap_or(block.width),
                stretch_height.unwrap_or(block.height),
            );

            let Some(child_node) = self.get(child) else {
                continue;
            };
            if child_node.display() == Display::None {
                continue;
            }
            let laid_out = (child_node.layout.width, child_node.layout.height);
            let width = stretch_width.unwrap_or(laid_out.0);
            let height = stretch_height.unwrap_or(laid_out.1);
            if (width, height) != laid_out {
                if let Some(child_node) = self.node_mut(child) {
                    child_node.layout.width = width;
                    child_node.layout.height = height;
                }
                self.relayout_contents(child, width, height);
            }

            let x = horizontal.place(block.x, block.width, width);
            let y = if dims.position == Position::Sticky {
                self.sticky_offset(vertical, block, height)
            } else {
                vertical.place(block.y, block.height, height)
            };

            tracing::trace!(node = %child, position = %dims.position, x, y, width, height, "placed out-of-flow box");

            if let Some(child_node) = self.node_mut(child) {
                child_node.layout.x = x;
                child_node.layout.y = y;
            }
            self.stats.out_of_flow_positioned += 1;
            self.resolve_positions(child);
        }
    }

    /// Vertical position of a sticky box for the configured scroll offset.
    ///
    /// The box keeps its top inset below the scrolled viewport edge without
    /// leaving its containing block.
    fn sticky_offset(&self, vertical: Insets, block: Rect, height: f32) -> f32 {
        let Some(top) = vertical.start else {
            return vertical.place(block.y, block.height, height);
        };
        let stuck = (block.y + top).max(self.config().scroll_y + top);
        stuck.min(block.bottom() - height).max(block.y)
    }

    /// Content box an out-of-flow box resolves its insets against
    fn containing_block(&self, id: NodeId, position: Position) -> Rect {
        if position == Position::Fixed {
            let config = self.config();
            if !config.has_viewport() {
                tracing::warn!(node = %id, "fixed-position box laid out without a viewport size");
            }
            return Rect::new(0.0, 0.0, config.viewport_width, config.viewport_height);
        }

        let mut ancestor = self.parent(id);
        while let Some(candidate) = ancestor {
            let relative = self.get(candidate).is_some_and(|node| node.position() == Position::Relative);
            if relative || Some(candidate) == self.layout_root {
                return self.content_rect(candidate);
            }
            ancestor = self.parent(candidate);
        }

        self.layout_root.map_or_else(Rect::default, |root| self.content_rect(root))
    }

    /// Absolute content box of a resolved box
    fn content_rect(&self, id: NodeId) -> Rect {
        let Some(node) = self.get(id) else {
            return Rect::default();
        };
        let reference = node.last_available.map_or(node.layout.width, |(width, _)| width);
        node.layout.rect().shrink(node.padding_border(reference))
    }
}
