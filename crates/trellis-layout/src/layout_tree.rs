//! Layout Tree
//!
//! Arena of styled boxes. Boxes are addressed by [`NodeId`]; each box owns an
//! ordered list of child ids and keeps a non-owning link to its parent.

use crate::box_model::{EdgeSizes, Layout};
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::invalidation::LayoutStats;
use crate::strategy::LayoutStrategy;
use crate::style::{Dimensions, Display, Edges, FlexStyle, Position, Style};
use serde::{Deserialize, Serialize};
use slab::Slab;
use std::fmt;

/// Box identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A box in the layout tree
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) style: Style,
    pub(crate) layout: Layout,
    /// Position relative to the parent's border box, set by the parent's strategy
    pub(crate) local_x: f32,
    pub(crate) local_y: f32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Out-of-flow children collected by the last strategy run
    pub(crate) out_of_flow: Vec<NodeId>,
    pub(crate) strategy: LayoutStrategy,
    pub(crate) dirty: bool,
    pub(crate) has_dirty_descendant: bool,
    /// Available size of the last layout step
    pub(crate) last_available: Option<(f32, f32)>,
    /// Unconstrained size from the last flex basis pass
    pub(crate) measured: Option<(f32, f32)>,
}

impl Node {
    fn new(style: Style) -> Self {
        Self {
            strategy: LayoutStrategy::for_display(style.dimensions.display),
            style,
            layout: Layout::default(),
            local_x: 0.0,
            local_y: 0.0,
            parent: None,
            children: Vec::new(),
            out_of_flow: Vec::new(),
            dirty: true,
            has_dirty_descendant: false,
            last_available: None,
            measured: None,
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }

    pub fn display(&self) -> Display {
        self.style.dimensions.display
    }

    pub fn position(&self) -> Position {
        self.style.dimensions.position
    }

    /// Padding resolved against `reference`, plus border
    pub(crate) fn padding_border(&self, reference: f32) -> EdgeSizes {
        self.style.padding.resolve(reference) + self.style.border
    }

    /// Whether the last layout step ran with this available size
    pub(crate) fn laid_out_with(&self, available: (f32, f32)) -> bool {
        self.last_available
            .is_some_and(|last| same_size(last.0, available.0) && same_size(last.1, available.1))
    }
}

/// Layout tree - arena of styled boxes
#[derive(Debug, Default)]
pub struct LayoutTree {
    nodes: Slab<Node>,
    config: LayoutConfig,
    pub(crate) stats: LayoutStats,
    /// Root of the pass in progress
    pub(crate) layout_root: Option<NodeId>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::with_config(LayoutConfig::default())
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self {
            nodes: Slab::with_capacity(256),
            config,
            stats: LayoutStats::default(),
            layout_root: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut LayoutConfig {
        &mut self.config
    }

    /// Counters of the most recent [`calculate`](Self::calculate)
    pub fn stats(&self) -> LayoutStats {
        self.stats
    }

    /// Create a detached block box with the default style
    pub fn create_node(&mut self) -> NodeId {
        self.create_node_with_style(Style::default())
    }

    /// Create a detached box
    pub fn create_node_with_style(&mut self, style: Style) -> NodeId {
        NodeId(self.nodes.insert(Node::new(style)))
    }

    /// Number of boxes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id.0)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Place a box relative to its parent's border box
    pub(crate) fn set_local_position(&mut self, id: NodeId, x: f32, y: f32) {
        if let Some(node) = self.node_mut(id) {
            node.local_x = x;
            node.local_y = y;
        }
    }

    /// Computed layout of a box
    pub fn layout(&self, id: NodeId) -> Option<&Layout> {
        self.get(id).map(|node| &node.layout)
    }

    pub fn style(&self, id: NodeId) -> Option<&Style> {
        self.get(id).map(|node| &node.style)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Children in tree order (empty for unknown boxes)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Append a detached box as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        if !self.contains(parent) {
            return Err(LayoutError::NodeNotFound(parent));
        }
        let current = self.get(child).ok_or(LayoutError::NodeNotFound(child))?.parent;
        if let Some(current) = current {
            return Err(LayoutError::AlreadyAttached { child, parent: current });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(LayoutError::Cycle { child, parent });
        }

        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        self.mark_dirty(parent);
        Ok(())
    }

    /// Detach `child` from `parent`. The child and its subtree stay alive.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        if !self.contains(parent) {
            return Err(LayoutError::NodeNotFound(parent));
        }
        let current = self.get(child).ok_or(LayoutError::NodeNotFound(child))?.parent;
        if current != Some(parent) {
            return Err(LayoutError::NotAChild { child, parent });
        }

        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&id| id != child);
            node.out_of_flow.retain(|&id| id != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
        self.mark_dirty(parent);
        Ok(())
    }

    /// Detach a box and release it together with its whole subtree
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), LayoutError> {
        let parent = self.get(id).ok_or(LayoutError::NodeNotFound(id))?.parent;
        if let Some(parent) = parent {
            self.remove_child(parent, id)?;
        }

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.try_remove(next.0) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Mutable access to the whole style; marks the box dirty
    pub fn style_mut(&mut self, id: NodeId) -> Option<&mut Style> {
        if !self.contains(id) {
            return None;
        }
        self.mark_dirty(id);
        self.node_mut(id).map(|node| &mut node.style)
    }

    /// Replace the whole style
    pub fn set_style(&mut self, id: NodeId, style: Style) -> Result<(), LayoutError> {
        let current = self.style_mut(id).ok_or(LayoutError::NodeNotFound(id))?;
        *current = style;
        Ok(())
    }

    pub fn dimensions_mut(&mut self, id: NodeId) -> Option<&mut Dimensions> {
        self.style_mut(id).map(|style| &mut style.dimensions)
    }

    pub fn margin_mut(&mut self, id: NodeId) -> Option<&mut Edges> {
        self.style_mut(id).map(|style| &mut style.margin)
    }

    pub fn padding_mut(&mut self, id: NodeId) -> Option<&mut Edges> {
        self.style_mut(id).map(|style| &mut style.padding)
    }

    pub fn border_mut(&mut self, id: NodeId) -> Option<&mut EdgeSizes> {
        self.style_mut(id).map(|style| &mut style.border)
    }

    pub fn flex_mut(&mut self, id: NodeId) -> Option<&mut FlexStyle> {
        self.style_mut(id).map(|style| &mut style.flex)
    }

    /// Relative position offsets
    pub fn offsets_mut(&mut self, id: NodeId) -> Option<&mut Edges> {
        self.style_mut(id).map(|style| &mut style.offsets)
    }

    pub fn set_display(&mut self, id: NodeId, display: Display) -> Result<(), LayoutError> {
        let dimensions = self.dimensions_mut(id).ok_or(LayoutError::NodeNotFound(id))?;
        dimensions.display = display;
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Position) -> Result<(), LayoutError> {
        let dimensions = self.dimensions_mut(id).ok_or(LayoutError::NodeNotFound(id))?;
        dimensions.position = position;
        Ok(())
    }

    /// Lay out the subtree rooted at `root` within the given space.
    ///
    /// NaN on either axis means the space is unconstrained. Afterwards every
    /// box in the subtree carries absolute coordinates with `root` at the
    /// origin.
    pub fn calculate(&mut self, root: NodeId, available_width: f32, available_height: f32) {
        if !self.contains(root) {
            tracing::warn!(node = %root, "calculate called on unknown node");
            return;
        }

        self.stats = LayoutStats::default();
        self.layout_root = Some(root);
        tracing::debug!(root = %root, available_width, available_height, "layout pass started");

        self.layout_node(root, available_width, available_height);
        self.place_root(root, available_width, available_height);

        self.layout_root = None;
        tracing::debug!(
            boxes = self.len(),
            measured = self.stats.boxes_measured,
            strategies_run = self.stats.strategies_run,
            strategies_skipped = self.stats.strategies_skipped,
            "layout pass finished"
        );
    }

    /// Lay out one box and, when needed, its children.
    pub(crate) fn layout_node(&mut self, id: NodeId, available_width: f32, available_height: f32) {
        let available = (available_width, available_height);
        let Some(node) = self.node_mut(id) else {
            return;
        };

        if node.style.dimensions.display == Display::None {
            node.layout.width = 0.0;
            node.layout.height = 0.0;
            node.dirty = false;
            node.has_dirty_descendant = false;
            node.last_available = Some(available);
            return;
        }

        let resized = !node.laid_out_with(available);

        // Strategies always run on freshly computed dimensions
        if resized || self.needs_layout(id) {
            self.compute_dimensions(id, available_width, available_height);
            self.stats.boxes_measured += 1;

            let strategy = self.get(id).map(|node| node.strategy).unwrap_or_default();
            strategy.layout(self, id, available_width, available_height);
            self.stats.strategies_run += 1;
        } else {
            self.stats.strategies_skipped += 1;
        }

        if let Some(node) = self.node_mut(id) {
            node.dirty = false;
            node.has_dirty_descendant = false;
            node.last_available = Some(available);
        }
    }

    /// Re-run the strategy of `id` at a size imposed by its parent, keeping that size.
    ///
    /// An axis the box was measured on without constraint is offered the
    /// imposed size, so auto-sized containers arrange their children for it.
    pub(crate) fn relayout_contents(&mut self, id: NodeId, width: f32, height: f32) {
        let Some(node) = self.get(id) else {
            return;
        };
        if !node.has_children() {
            return;
        }
        let strategy = node.strategy;
        let (last_width, last_height) = node.last_available.unwrap_or((width, height));
        let available_width = if last_width.is_nan() { width } else { last_width };
        let available_height = if last_height.is_nan() { height } else { last_height };

        strategy.layout(self, id, available_width, available_height);
        self.stats.strategies_run += 1;

        if let Some(node) = self.node_mut(id) {
            node.layout.width = width;
            node.layout.height = height;
        }
    }

    /// Nested copy of the computed layouts below `id`
    pub fn snapshot(&self, id: NodeId) -> Option<LayoutSnapshot> {
        let node = self.get(id)?;
        Some(LayoutSnapshot {
            id,
            display: node.display(),
            position: node.position(),
            layout: node.layout,
            children: node.children.iter().filter_map(|&child| self.snapshot(child)).collect(),
        })
    }
}

/// Available sizes compare equal when both are unconstrained
fn same_size(a: f32, b: f32) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Serializable view of a laid-out subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub id: NodeId,
    pub display: Display,
    pub position: Position,
    pub layout: Layout,
    pub children: Vec<LayoutSnapshot>,
}
