//! Box Styles
//!
//! The declared style of a box, split into independent property groups.
//! Every group can be replaced or edited on its own through the tree's
//! accessors, each of which marks the box dirty.

use crate::box_model::EdgeSizes;
use crate::length::Length;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete declared style of a box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub dimensions: Dimensions,
    pub margin: Edges,
    pub padding: Edges,
    /// Border widths in pixels
    pub border: EdgeSizes,
    pub flex: FlexStyle,
    /// Relative position offsets
    pub offsets: Edges,
}

/// Display kind, size constraints, insets and position kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub display: Display,
    pub position: Position,
    pub width: Length,
    pub height: Length,
    pub min_width: Length,
    pub min_height: Length,
    pub max_width: Length,
    pub max_height: Length,
    /// Insets used by out-of-flow boxes
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Dimensions {
    /// Fixed width and height
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            width: Length::Fixed(width),
            height: Length::Fixed(height),
            ..Self::default()
        }
    }
}

/// Four edges of lengths (margin, padding, relative offsets)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl Default for Edges {
    fn default() -> Self {
        Self::all(Length::ZERO)
    }
}

impl Edges {
    pub fn new(top: Length, right: Length, bottom: Length, left: Length) -> Self {
        Self { top, right, bottom, left }
    }

    pub fn all(value: Length) -> Self {
        Self::new(value, value, value, value)
    }

    /// Resolve every edge against one reference size.
    ///
    /// Auto edges and percentages of an indefinite reference become 0.
    pub fn resolve(&self, reference: f32) -> EdgeSizes {
        EdgeSizes {
            top: self.top.resolve_or_zero(reference),
            right: self.right.resolve_or_zero(reference),
            bottom: self.bottom.resolve_or_zero(reference),
            left: self.left.resolve_or_zero(reference),
        }
    }
}

/// Flex container and flex item properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlexStyle {
    pub direction: FlexDirection,
    pub wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub align_content: AlignContent,
    /// Override of the container's `align_items`
    pub align_self: Option<AlignItems>,
    pub grow: f32,
    pub shrink: f32,
    pub basis: Length,
    pub order: i32,
    pub gap: Gap,
}

impl Default for FlexStyle {
    fn default() -> Self {
        Self {
            direction: FlexDirection::default(),
            wrap: FlexWrap::default(),
            justify_content: JustifyContent::default(),
            align_items: AlignItems::default(),
            align_content: AlignContent::default(),
            align_self: None,
            grow: 0.0,
            shrink: 1.0,
            basis: Length::Auto,
            order: 0,
            gap: Gap::default(),
        }
    }
}

/// Gaps between flex lines (`row`) and flex items in a line (`column`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub row: Length,
    pub column: Length,
}

impl Default for Gap {
    fn default() -> Self {
        Self { row: Length::ZERO, column: Length::ZERO }
    }
}

/// Display kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Display {
    None,
    #[default]
    Block,
    Inline,
    InlineBlock,
    Flex,
    InlineFlex,
}

impl Display {
    /// Lays out its children with the flex algorithm
    pub fn is_flex_container(self) -> bool {
        matches!(self, Display::Flex | Display::InlineFlex)
    }

    /// Takes a whole line in normal flow
    pub fn is_block_level(self) -> bool {
        matches!(self, Display::Block | Display::Flex)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Display::None => "none",
            Display::Block => "block",
            Display::Inline => "inline",
            Display::InlineBlock => "inline-block",
            Display::Flex => "flex",
            Display::InlineFlex => "inline-flex",
        }
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl Position {
    /// Static and relative boxes take part in their parent's flow
    pub fn is_in_flow(self) -> bool {
        matches!(self, Position::Static | Position::Relative)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Static => "static",
            Position::Relative => "relative",
            Position::Absolute => "absolute",
            Position::Fixed => "fixed",
            Position::Sticky => "sticky",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flex direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlexDirection {
    #[default]
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    pub fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    pub fn is_reversed(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::RowReverse => "row-reverse",
            Self::Column => "column",
            Self::ColumnReverse => "column-reverse",
        }
    }
}

impl fmt::Display for FlexDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flex wrap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

impl FlexWrap {
    pub fn is_wrapping(self) -> bool {
        !matches!(self, Self::NoWrap)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoWrap => "nowrap",
            Self::Wrap => "wrap",
            Self::WrapReverse => "wrap-reverse",
        }
    }
}

impl fmt::Display for FlexWrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Justify content (main axis)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JustifyContent {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

impl JustifyContent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FlexStart => "flex-start",
            Self::FlexEnd => "flex-end",
            Self::Center => "center",
            Self::SpaceBetween => "space-between",
            Self::SpaceAround => "space-around",
            Self::SpaceEvenly => "space-evenly",
        }
    }
}

impl fmt::Display for JustifyContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Align items (cross axis)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignItems {
    #[default]
    Stretch,
    FlexStart,
    FlexEnd,
    Center,
    /// Behaves as `FlexStart`; leaf content has no text baseline
    Baseline,
}

impl AlignItems {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stretch => "stretch",
            Self::FlexStart => "flex-start",
            Self::FlexEnd => "flex-end",
            Self::Center => "center",
            Self::Baseline => "baseline",
        }
    }
}

impl fmt::Display for AlignItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Align content (multi-line)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignContent {
    #[default]
    Stretch,
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

impl AlignContent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stretch => "stretch",
            Self::FlexStart => "flex-start",
            Self::FlexEnd => "flex-end",
            Self::Center => "center",
            Self::SpaceBetween => "space-between",
            Self::SpaceAround => "space-around",
            Self::SpaceEvenly => "space-evenly",
        }
    }
}

impl fmt::Display for AlignContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
