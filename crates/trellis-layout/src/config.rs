//! Layout Configuration

use crate::invalidation::DirtyPropagation;

/// Inputs that come from outside the box tree
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Viewport width that fixed-position boxes resolve against
    pub viewport_width: f32,

    /// Viewport height that fixed-position boxes resolve against
    pub viewport_height: f32,

    /// Vertical scroll offset seen by sticky boxes
    pub scroll_y: f32,

    /// How a style change marks the tree for relayout
    pub dirty_propagation: DirtyPropagation,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport_width: 0.0,
            viewport_height: 0.0,
            scroll_y: 0.0,
            dirty_propagation: DirtyPropagation::Shallow,
        }
    }
}

impl LayoutConfig {
    /// Config with a viewport for fixed-position boxes
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..Self::default()
        }
    }

    pub(crate) fn has_viewport(&self) -> bool {
        self.viewport_width > 0.0 || self.viewport_height > 0.0
    }
}
