//! Normal Flow Layout
//!
//! Block-level children stack vertically. Inline-level children are packed
//! into left-aligned runs that wrap when the content width is exceeded.

use crate::box_model::EdgeSizes;
use crate::dimensions::clamp_size;
use crate::layout_tree::{LayoutTree, NodeId};
use crate::style::Display;

/// Inline box waiting in the current run
struct InlineItem {
    id: NodeId,
    outer_width: f32,
    margin: EdgeSizes,
}

/// Block formatting context of one container
struct BlockFormattingContext {
    content_left: f32,
    content_top: f32,
    content_width: f32,
    cursor_x: f32,
    /// Where the next block or run starts, relative to the content top
    cursor_y: f32,
    line_height: f32,
    line: Vec<InlineItem>,
}

impl BlockFormattingContext {
    fn new(content_left: f32, content_top: f32, content_width: f32) -> Self {
        Self {
            content_left,
            content_top,
            content_width,
            cursor_x: 0.0,
            cursor_y: 0.0,
            line_height: 0.0,
            line: Vec::new(),
        }
    }

    /// Give a block-level box its own line
    fn place_block(&mut self, tree: &mut LayoutTree, id: NodeId, height: f32, margin: EdgeSizes) {
        self.flush_line(tree);
        tree.set_local_position(
            id,
            self.content_left + margin.left,
            self.content_top + self.cursor_y + margin.top,
        );
        self.cursor_y += height + margin.vertical();
    }

    /// Add an inline-level box to the current run, wrapping first if it does not fit
    fn push_inline(&mut self, tree: &mut LayoutTree, id: NodeId, width: f32, height: f32, margin: EdgeSizes) {
        let outer_width = width + margin.horizontal();
        // Never true for an unconstrained (NaN) content width
        if self.cursor_x + outer_width > self.content_width && !self.line.is_empty() {
            self.flush_line(tree);
        }

        self.line.push(InlineItem { id, outer_width, margin });
        self.cursor_x += outer_width;
        self.line_height = self.line_height.max(height + margin.vertical());
    }

    /// Lay out the pending run and start a new line below it
    fn flush_line(&mut self, tree: &mut LayoutTree) {
        if self.line.is_empty() {
            return;
        }

        let mut x = 0.0;
        for item in self.line.drain(..) {
            tree.set_local_position(
                item.id,
                self.content_left + x + item.margin.left,
                self.content_top + self.cursor_y + item.margin.top,
            );
            x += item.outer_width;
        }

        self.cursor_y += self.line_height;
        self.cursor_x = 0.0;
        self.line_height = 0.0;
    }
}

/// Arrange the children of `id` in normal flow
pub(crate) fn layout_normal_flow(tree: &mut LayoutTree, id: NodeId, available_width: f32, available_height: f32) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let dims = node.style.dimensions;
    let children = node.children.clone();
    let padding_border = node.padding_border(available_width);
    let (width, height) = (node.layout.width, node.layout.height);
    let auto_height = dims.height.is_auto() || height.is_nan();

    let content_width = if width.is_nan() {
        available_width
    } else {
        (width - padding_border.horizontal()).max(0.0)
    };
    let content_height = if auto_height {
        available_height
    } else {
        (height - padding_border.vertical()).max(0.0)
    };

    let mut context = BlockFormattingContext::new(padding_border.left, padding_border.top, content_width);

    for child in children {
        let in_flow = tree.get(child).is_some_and(|c| c.position().is_in_flow());
        if !in_flow {
            if let Some(node) = tree.node_mut(id) {
                node.out_of_flow.push(child);
            }
            continue;
        }

        tree.layout_node(child, content_width, content_height);

        let Some(child_node) = tree.get(child) else {
            continue;
        };
        let display = child_node.display();
        if display == Display::None {
            continue;
        }
        let margin = child_node.style.margin.resolve(content_width);
        let (child_width, child_height) = (child_node.layout.width, child_node.layout.height);

        if display.is_block_level() {
            context.place_block(tree, child, child_height, margin);
        } else {
            context.push_inline(tree, child, child_width, child_height, margin);
        }
    }
    context.flush_line(tree);

    if auto_height {
        let height = clamp_size(
            context.cursor_y + padding_border.vertical(),
            dims.min_height,
            dims.max_height,
            available_height,
            padding_border.vertical(),
        );
        if let Some(node) = tree.node_mut(id) {
            node.layout.height = height;
        }
    }
}
