//! Trellis Layout Engine
//!
//! CSS-like box layout: normal flow, flexbox and out-of-flow positioning
//! over an arena of styled boxes.
//!
//! ```
//! use trellis_layout::{Dimensions, Display, LayoutTree};
//!
//! let mut tree = LayoutTree::new();
//! let root = tree.create_node();
//! tree.set_display(root, Display::Flex).unwrap();
//!
//! let child = tree.create_node();
//! if let Some(dims) = tree.dimensions_mut(child) {
//!     *dims = Dimensions::sized(100.0, 50.0);
//! }
//! tree.append_child(root, child).unwrap();
//!
//! tree.calculate(root, 800.0, 600.0);
//! assert_eq!(tree.layout(child).unwrap().width, 100.0);
//! assert_eq!(tree.layout(root).unwrap().width, 800.0);
//! ```

mod block;
mod box_model;
mod config;
mod dimensions;
mod error;
mod flex;
mod invalidation;
mod layout_tree;
mod length;
mod positioned;
mod strategy;
mod style;

pub use box_model::{EdgeSizes, Layout, Rect};
pub use config::LayoutConfig;
pub use error::LayoutError;
pub use invalidation::{DirtyPropagation, LayoutStats};
pub use layout_tree::{LayoutSnapshot, LayoutTree, Node, NodeId};
pub use length::Length;
pub use strategy::LayoutStrategy;
pub use style::{
    AlignContent, AlignItems, Dimensions, Display, Edges, FlexDirection, FlexStyle, FlexWrap, Gap, JustifyContent,
    Position, Style,
};
