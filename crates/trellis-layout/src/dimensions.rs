//! Intrinsic Dimensions
//!
//! Resolves a box's own border-box width and height from its declared
//! dimensions before its children are arranged.

use crate::layout_tree::{LayoutTree, NodeId};
use crate::length::Length;
use crate::strategy::LayoutStrategy;
use crate::style::Display;

/// Apply min/max constraints to a border-box size.
///
/// Auto constraints are skipped and min wins over max. The result never drops
/// below the box's own padding and border. NaN sizes are returned unchanged.
pub(crate) fn clamp_size(size: f32, min: Length, max: Length, reference: f32, padding_border: f32) -> f32 {
    if size.is_nan() {
        return size;
    }
    let mut clamped = size;
    if let Some(max) = max.resolve_definite(reference) {
        clamped = clamped.min(max);
    }
    if let Some(min) = min.resolve_definite(reference) {
        clamped = clamped.max(min);
    }
    clamped.max(padding_border)
}

impl LayoutTree {
    /// Compute width/height of `id` against the space offered by its parent.
    ///
    /// An auto height stays NaN; the box's strategy fills it in from its
    /// children. Inline-level boxes with an auto width lay out their children
    /// here to find their shrink-to-fit width.
    pub(crate) fn compute_dimensions(&mut self, id: NodeId, available_width: f32, available_height: f32) {
        let Some(node) = self.get(id) else {
            return;
        };
        let style = node.style;
        let dims = style.dimensions;
        let display = dims.display;
        let parent_height = node.parent.and_then(|parent| self.style(parent)).map(|s| s.dimensions.height);
        let children = node.children.clone();

        let padding_border = node.padding_border(available_width);
        let margin = style.margin.resolve(available_width);

        let width = match dims.width.resolve_definite(available_width) {
            Some(width) => width,
            None => match display {
                Display::Block | Display::Flex => {
                    if available_width.is_nan() {
                        padding_border.horizontal()
                    } else {
                        (available_width - margin.horizontal() - padding_border.horizontal()).max(0.0)
                            + padding_border.horizontal()
                    }
                }
                Display::Inline | Display::InlineBlock => {
                    self.shrink_to_fit_width(&children, available_width, available_height)
                        + padding_border.horizontal()
                }
                // Shrink-wrapped by the flex strategy
                Display::InlineFlex => f32::NAN,
                Display::None => 0.0,
            },
        };
        let width = clamp_size(width, dims.min_width, dims.max_width, available_width, padding_border.horizontal());

        // Percent heights scale the available height by the parent's declared height value
        let height = match dims.height {
            Length::Fixed(height) => height,
            Length::Percent(_) => match parent_height {
                Some(Length::Fixed(value) | Length::Percent(value)) if !available_height.is_nan() => {
                    available_height * value / 100.0
                }
                _ => f32::NAN,
            },
            Length::Auto => f32::NAN,
        };
        let height = clamp_size(height, dims.min_height, dims.max_height, available_height, padding_border.vertical());

        tracing::trace!(node = %id, display = %dims.display, width, height, "computed dimensions");

        if let Some(node) = self.node_mut(id) {
            node.strategy = LayoutStrategy::for_display(display);
            node.layout.width = width;
            node.layout.height = height;
        }
    }

    /// Widest in-flow child including its horizontal margins
    fn shrink_to_fit_width(&mut self, children: &[NodeId], available_width: f32, available_height: f32) -> f32 {
        let mut widest: f32 = 0.0;
        for &child in children {
            let Some(node) = self.get(child) else {
                continue;
            };
            if !node.position().is_in_flow() || node.display() == Display::None {
                continue;
            }

            self.layout_node(child, available_width, available_height);

            if let Some(node) = self.get(child) {
                let margin = node.style.margin.resolve(available_width);
                widest = widest.max(node.layout.width + margin.horizontal());
            }
        }
        widest
    }
}
