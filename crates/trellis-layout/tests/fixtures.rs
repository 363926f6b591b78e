//! Layout fixtures
//!
//! Reference layouts for normal flow, flexbox, spacing and positioned boxes.

use trellis_layout::*;

fn node(tree: &mut LayoutTree, parent: Option<NodeId>, configure: impl FnOnce(&mut Style)) -> NodeId {
    let mut style = Style::default();
    configure(&mut style);
    let id = tree.create_node_with_style(style);
    if let Some(parent) = parent {
        tree.append_child(parent, id).unwrap();
    }
    id
}

fn flex_container(tree: &mut LayoutTree, width: f32, height: f32, direction: FlexDirection) -> NodeId {
    node(tree, None, |s| {
        s.dimensions = Dimensions { display: Display::Flex, ..Dimensions::sized(width, height) };
        s.flex.direction = direction;
    })
}

fn fixed(tree: &mut LayoutTree, parent: NodeId, width: f32, height: f32) -> NodeId {
    node(tree, Some(parent), |s| s.dimensions = Dimensions::sized(width, height))
}

fn layout(tree: &LayoutTree, id: NodeId) -> Layout {
    *tree.layout(id).unwrap()
}

// ============================================================================
// BASICS
// ============================================================================

#[test]
fn test_default_values() {
    let mut tree = LayoutTree::new();
    let root = tree.create_node();

    assert!(tree.children(root).is_empty());
    assert_eq!(layout(&tree, root), Layout::default());
    assert_eq!(tree.style(root).unwrap().dimensions.display, Display::Block);
}

#[test]
fn test_simple_layout() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, None, |s| s.dimensions = Dimensions::sized(500.0, 500.0));
    let child = fixed(&mut tree, root, 100.0, 100.0);

    tree.calculate(root, 500.0, 500.0);

    let root_layout = layout(&tree, root);
    assert_eq!((root_layout.width, root_layout.height), (500.0, 500.0));
    let child_layout = layout(&tree, child);
    assert_eq!((child_layout.width, child_layout.height), (100.0, 100.0));
}

#[test]
fn test_flex_row_basics() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 500.0, 500.0, FlexDirection::Row);
    let a = fixed(&mut tree, root, 100.0, 100.0);
    let b = fixed(&mut tree, root, 100.0, 100.0);

    tree.calculate(root, 500.0, 500.0);

    assert_eq!((layout(&tree, a).x, layout(&tree, a).width), (0.0, 100.0));
    assert_eq!((layout(&tree, b).x, layout(&tree, b).width), (100.0, 100.0));
}

#[test]
fn test_flex_column_basics() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 500.0, 500.0, FlexDirection::Column);
    let a = fixed(&mut tree, root, 100.0, 100.0);
    let b = fixed(&mut tree, root, 100.0, 100.0);

    tree.calculate(root, 500.0, 500.0);

    assert_eq!((layout(&tree, a).y, layout(&tree, a).height), (0.0, 100.0));
    assert_eq!((layout(&tree, b).y, layout(&tree, b).height), (100.0, 100.0));
}

#[test]
fn test_flex_grow_takes_remaining_space() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 500.0, 100.0, FlexDirection::Row);
    let a = fixed(&mut tree, root, 100.0, 100.0);
    let b = node(&mut tree, Some(root), |s| {
        s.dimensions.height = Length::px(100.0);
        s.flex.grow = 1.0;
    });

    tree.calculate(root, 500.0, 100.0);

    assert_eq!(layout(&tree, a).width, 100.0);
    assert_eq!(layout(&tree, b).width, 400.0);
    assert_eq!(layout(&tree, b).x, 100.0);
}

#[test]
fn test_padding_offsets_flex_items() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 500.0, 500.0, FlexDirection::Row);
    if let Some(padding) = tree.padding_mut(root) {
        padding.left = Length::px(20.0);
        padding.top = Length::px(10.0);
    }
    let child = fixed(&mut tree, root, 100.0, 100.0);

    tree.calculate(root, 500.0, 500.0);

    assert_eq!((layout(&tree, child).x, layout(&tree, child).y), (20.0, 10.0));
}

// ============================================================================
// FLEX
// ============================================================================

#[test]
fn test_flex_basis_flex_grow_column() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 100.0, 100.0, FlexDirection::Column);
    let a = node(&mut tree, Some(root), |s| {
        s.flex.grow = 1.0;
        s.flex.basis = Length::px(50.0);
    });
    let b = node(&mut tree, Some(root), |s| s.flex.grow = 1.0);

    tree.calculate(root, 100.0, 100.0);

    let root_layout = layout(&tree, root);
    assert_eq!((root_layout.width, root_layout.height), (100.0, 100.0));
    let (la, lb) = (layout(&tree, a), layout(&tree, b));
    assert_eq!((la.width, la.height, la.y), (100.0, 75.0, 0.0));
    assert_eq!((lb.width, lb.height, lb.y), (100.0, 25.0, 75.0));
}

#[test]
fn test_flex_shrink_row() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 500.0, 500.0, FlexDirection::Row);
    let a = fixed(&mut tree, root, 500.0, 100.0);
    let b = fixed(&mut tree, root, 500.0, 100.0);

    tree.calculate(root, 500.0, 500.0);

    let (la, lb) = (layout(&tree, a), layout(&tree, b));
    assert_eq!((la.x, la.width, la.height), (0.0, 250.0, 100.0));
    assert_eq!((lb.x, lb.width, lb.height), (250.0, 250.0, 100.0));
}

#[test]
fn test_flex_basis_overrides_main_size() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 100.0, 100.0, FlexDirection::Column);
    let a = node(&mut tree, Some(root), |s| {
        s.flex.grow = 1.0;
        s.flex.basis = Length::px(50.0);
        s.dimensions.height = Length::px(20.0);
    });
    let b = node(&mut tree, Some(root), |s| {
        s.flex.grow = 1.0;
        s.dimensions.height = Length::px(10.0);
    });
    let c = node(&mut tree, Some(root), |s| {
        s.flex.grow = 1.0;
        s.dimensions.height = Length::px(10.0);
    });

    tree.calculate(root, 100.0, 100.0);

    assert_eq!((layout(&tree, a).width, layout(&tree, a).height), (100.0, 60.0));
    assert_eq!((layout(&tree, b).height, layout(&tree, b).y), (20.0, 60.0));
    assert_eq!((layout(&tree, c).height, layout(&tree, c).y), (20.0, 80.0));
}

#[test]
fn test_flex_direction_column_reverse() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 100.0, 100.0, FlexDirection::ColumnReverse);
    let a = fixed(&mut tree, root, 100.0, 20.0);
    let b = fixed(&mut tree, root, 100.0, 20.0);

    tree.calculate(root, 100.0, 100.0);

    assert_eq!(layout(&tree, a).y, 80.0);
    assert_eq!(layout(&tree, b).y, 60.0);
}

#[test]
fn test_block_container_ignores_flex_wrap() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, None, |s| {
        s.dimensions = Dimensions::sized(100.0, 100.0);
        s.flex.wrap = FlexWrap::Wrap;
    });
    let a = fixed(&mut tree, root, 60.0, 40.0);
    let b = fixed(&mut tree, root, 60.0, 40.0);

    tree.calculate(root, 100.0, 100.0);

    assert_eq!((layout(&tree, a).x, layout(&tree, a).y), (0.0, 0.0));
    assert_eq!((layout(&tree, b).x, layout(&tree, b).y), (0.0, 40.0));
}

#[test]
fn test_order_then_tree_order() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 300.0, 10.0, FlexDirection::Row);
    let orders = [1, 0, 1, -1];
    let ids: Vec<_> = orders
        .iter()
        .map(|&order| {
            node(&mut tree, Some(root), |s| {
                s.dimensions = Dimensions::sized(10.0, 10.0);
                s.flex.order = order;
            })
        })
        .collect();

    tree.calculate(root, 300.0, 10.0);

    let xs: Vec<f32> = ids.iter().map(|&id| layout(&tree, id).x).collect();
    assert_eq!(xs, vec![20.0, 10.0, 30.0, 0.0]);
}

// ============================================================================
// GAPS
// ============================================================================

#[test]
fn test_column_gap_flexible() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 80.0, 100.0, FlexDirection::Row);
    if let Some(flex) = tree.flex_mut(root) {
        flex.gap = Gap { row: Length::px(20.0), column: Length::px(10.0) };
    }
    let ids: Vec<_> = (0..3)
        .map(|_| {
            node(&mut tree, Some(root), |s| {
                s.flex.grow = 1.0;
                s.flex.shrink = 1.0;
                s.flex.basis = Length::percent(0.0);
            })
        })
        .collect();

    tree.calculate(root, 80.0, 100.0);

    let root_layout = layout(&tree, root);
    assert_eq!((root_layout.width, root_layout.height), (80.0, 100.0));
    for (&id, x) in ids.iter().zip([0.0, 30.0, 60.0]) {
        let item = layout(&tree, id);
        assert_eq!((item.x, item.y, item.width, item.height), (x, 0.0, 20.0, 100.0));
    }
}

#[test]
fn test_column_gap_inflexible() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 80.0, 100.0, FlexDirection::Row);
    if let Some(flex) = tree.flex_mut(root) {
        flex.gap.column = Length::px(10.0);
    }
    let ids: Vec<_> = (0..3)
        .map(|_| node(&mut tree, Some(root), |s| s.dimensions.width = Length::px(20.0)))
        .collect();

    tree.calculate(root, 80.0, 100.0);

    for (&id, x) in ids.iter().zip([0.0, 30.0, 60.0]) {
        let item = layout(&tree, id);
        assert_eq!((item.x, item.y, item.width, item.height), (x, 0.0, 20.0, 100.0));
    }
}

#[test]
fn test_row_gap_between_lines() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 100.0, 100.0, FlexDirection::Row);
    if let Some(flex) = tree.flex_mut(root) {
        flex.wrap = FlexWrap::Wrap;
        flex.align_content = AlignContent::FlexStart;
        flex.gap.row = Length::px(15.0);
    }
    let a = fixed(&mut tree, root, 60.0, 20.0);
    let b = fixed(&mut tree, root, 60.0, 20.0);

    tree.calculate(root, 100.0, 100.0);

    assert_eq!(layout(&tree, a).y, 0.0);
    assert_eq!(layout(&tree, b).y, 35.0);
}

// ============================================================================
// ALIGNMENT
// ============================================================================

fn two_items_justified(justify: JustifyContent) -> (f32, f32) {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 100.0, 100.0, FlexDirection::Row);
    if let Some(flex) = tree.flex_mut(root) {
        flex.justify_content = justify;
    }
    let a = node(&mut tree, Some(root), |s| s.dimensions.width = Length::px(10.0));
    let b = node(&mut tree, Some(root), |s| s.dimensions.width = Length::px(10.0));
    tree.calculate(root, 100.0, 100.0);
    (layout(&tree, a).x, layout(&tree, b).x)
}

#[test]
fn test_justify_content_row() {
    assert_eq!(two_items_justified(JustifyContent::FlexStart), (0.0, 10.0));
    assert_eq!(two_items_justified(JustifyContent::FlexEnd), (80.0, 90.0));
    assert_eq!(two_items_justified(JustifyContent::Center), (40.0, 50.0));
}

#[test]
fn test_justify_content_center_single_item() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 500.0, 100.0, FlexDirection::Row);
    if let Some(flex) = tree.flex_mut(root) {
        flex.justify_content = JustifyContent::Center;
    }
    let child = fixed(&mut tree, root, 100.0, 100.0);

    tree.calculate(root, 500.0, 100.0);
    assert_eq!(layout(&tree, child).x, 200.0);
}

#[test]
fn test_align_items_stretch_column() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 100.0, 100.0, FlexDirection::Column);
    let child = node(&mut tree, Some(root), |s| s.dimensions.height = Length::px(10.0));

    tree.calculate(root, 100.0, 100.0);

    assert_eq!((layout(&tree, child).width, layout(&tree, child).height), (100.0, 10.0));
}

#[test]
fn test_align_items_center() {
    let mut tree = LayoutTree::new();
    let column = flex_container(&mut tree, 100.0, 100.0, FlexDirection::Column);
    if let Some(flex) = tree.flex_mut(column) {
        flex.align_items = AlignItems::Center;
    }
    let in_column = fixed(&mut tree, column, 10.0, 10.0);
    tree.calculate(column, 100.0, 100.0);
    assert_eq!((layout(&tree, in_column).x, layout(&tree, in_column).y), (45.0, 0.0));

    let row = flex_container(&mut tree, 500.0, 500.0, FlexDirection::Row);
    if let Some(flex) = tree.flex_mut(row) {
        flex.align_items = AlignItems::Center;
    }
    let in_row = fixed(&mut tree, row, 100.0, 100.0);
    tree.calculate(row, 500.0, 500.0);
    assert_eq!(layout(&tree, in_row).y, 200.0);
}

#[test]
fn test_align_self_flex_end() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 100.0, 100.0, FlexDirection::Column);
    let child = node(&mut tree, Some(root), |s| {
        s.dimensions = Dimensions::sized(10.0, 10.0);
        s.flex.align_self = Some(AlignItems::FlexEnd);
    });

    tree.calculate(root, 100.0, 100.0);
    assert_eq!(layout(&tree, child).x, 90.0);
}

// ============================================================================
// DIMENSIONS
// ============================================================================

#[test]
fn test_wrap_child() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, None, |s| s.dimensions.display = Display::Flex);
    fixed(&mut tree, root, 100.0, 100.0);

    tree.calculate(root, f32::NAN, f32::NAN);

    let root_layout = layout(&tree, root);
    assert_eq!((root_layout.width, root_layout.height), (100.0, 100.0));
}

#[test]
fn test_max_width() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 100.0, 100.0, FlexDirection::Row);
    let child = node(&mut tree, Some(root), |s| {
        s.dimensions = Dimensions { max_width: Length::px(50.0), ..Dimensions::sized(100.0, 10.0) };
    });

    tree.calculate(root, 100.0, 100.0);

    assert_eq!((layout(&tree, child).width, layout(&tree, child).height), (50.0, 10.0));
}

#[test]
fn test_min_width() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 100.0, 100.0, FlexDirection::Row);
    let a = node(&mut tree, Some(root), |s| {
        s.flex.grow = 1.0;
        s.dimensions.min_width = Length::px(60.0);
    });
    let b = node(&mut tree, Some(root), |s| s.flex.grow = 1.0);

    tree.calculate(root, 100.0, 100.0);

    assert_eq!(layout(&tree, a).width, 60.0);
    assert_eq!(layout(&tree, b).width, 40.0);
}

#[test]
fn test_percentage_width() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, None, |s| s.dimensions = Dimensions::sized(200.0, 200.0));
    let child = node(&mut tree, Some(root), |s| {
        s.dimensions.width = Length::percent(50.0);
        s.dimensions.height = Length::px(10.0);
    });

    tree.calculate(root, 200.0, 200.0);
    assert_eq!(layout(&tree, child).width, 100.0);
}

#[test]
fn test_padding_is_inside_declared_width() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 400.0, 100.0, FlexDirection::Row);
    if let Some(padding) = tree.padding_mut(root) {
        padding.left = Length::px(20.0);
        padding.right = Length::px(20.0);
    }
    let child = node(&mut tree, Some(root), |s| s.flex.grow = 1.0);

    tree.calculate(root, 400.0, 100.0);

    assert_eq!(layout(&tree, root).width, 400.0);
    assert_eq!((layout(&tree, child).x, layout(&tree, child).width), (20.0, 360.0));
}

// ============================================================================
// SPACING
// ============================================================================

#[test]
fn test_padding_no_size() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, None, |s| s.padding = Edges::all(Length::px(10.0)));

    tree.calculate(root, f32::NAN, f32::NAN);

    assert_eq!((layout(&tree, root).width, layout(&tree, root).height), (20.0, 20.0));
}

#[test]
fn test_padding_container_match_child() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, None, |s| {
        s.dimensions.display = Display::Flex;
        s.padding = Edges::all(Length::px(10.0));
    });
    let child = fixed(&mut tree, root, 10.0, 10.0);

    tree.calculate(root, f32::NAN, f32::NAN);

    assert_eq!((layout(&tree, root).width, layout(&tree, root).height), (30.0, 30.0));
    assert_eq!((layout(&tree, child).x, layout(&tree, child).y), (10.0, 10.0));
}

// ============================================================================
// MARGINS
// ============================================================================

#[test]
fn test_auto_margin() {
    let mut tree = LayoutTree::new();
    let root = node(&mut tree, None, |s| {
        s.dimensions = Dimensions {
            display: Display::Flex,
            position: Position::Absolute,
            ..Dimensions::sized(50.0, 50.0)
        };
    });
    let child = node(&mut tree, Some(root), |s| {
        s.dimensions = Dimensions::sized(25.0, 25.0);
        s.margin.left = Length::Auto;
    });

    tree.calculate(root, f32::NAN, f32::NAN);

    let root_layout = layout(&tree, root);
    assert_eq!((root_layout.x, root_layout.y, root_layout.width, root_layout.height), (0.0, 0.0, 50.0, 50.0));
    let child_layout = layout(&tree, child);
    assert_eq!((child_layout.x, child_layout.y, child_layout.width, child_layout.height), (25.0, 0.0, 25.0, 25.0));
}

#[test]
fn test_margin_percentage() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 100.0, 100.0, FlexDirection::Row);
    let child = fixed(&mut tree, root, 50.0, 50.0);
    if let Some(margin) = tree.margin_mut(child) {
        margin.left = Length::percent(10.0);
    }

    tree.calculate(root, 100.0, 100.0);
    assert_eq!(layout(&tree, child).x, 10.0);
}

#[test]
fn test_margin_side_overrides() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 100.0, 100.0, FlexDirection::Row);
    let child = fixed(&mut tree, root, 10.0, 10.0);
    if let Some(margin) = tree.margin_mut(child) {
        margin.left = Length::px(10.0);
        margin.right = Length::px(10.0);
        margin.left = Length::px(20.0);
    }

    tree.calculate(root, 100.0, 100.0);
    assert_eq!(layout(&tree, child).x, 20.0);
}

// ============================================================================
// ABSOLUTE POSITIONING
// ============================================================================

fn absolute_container(tree: &mut LayoutTree) -> NodeId {
    node(tree, None, |s| {
        s.dimensions = Dimensions { position: Position::Absolute, ..Dimensions::sized(100.0, 100.0) };
    })
}

#[test]
fn test_absolute_start_top() {
    let mut tree = LayoutTree::new();
    let root = absolute_container(&mut tree);
    let child = node(&mut tree, Some(root), |s| {
        s.dimensions = Dimensions {
            position: Position::Absolute,
            left: Length::px(10.0),
            top: Length::px(10.0),
            ..Dimensions::sized(10.0, 10.0)
        };
    });

    tree.calculate(root, 100.0, 100.0);

    let child_layout = layout(&tree, child);
    assert_eq!((child_layout.x, child_layout.y, child_layout.width, child_layout.height), (10.0, 10.0, 10.0, 10.0));
}

#[test]
fn test_absolute_right_with_auto_left() {
    let mut tree = LayoutTree::new();
    let root = absolute_container(&mut tree);
    let child = node(&mut tree, Some(root), |s| {
        s.dimensions = Dimensions {
            position: Position::Absolute,
            right: Length::px(10.0),
            ..Dimensions::sized(10.0, 10.0)
        };
    });

    tree.calculate(root, 100.0, 100.0);

    assert_eq!((layout(&tree, child).x, layout(&tree, child).y), (80.0, 0.0));
}

#[test]
fn test_absolute_all_insets_stretch() {
    let mut tree = LayoutTree::new();
    let root = absolute_container(&mut tree);
    let child = node(&mut tree, Some(root), |s| {
        s.dimensions = Dimensions {
            position: Position::Absolute,
            left: Length::px(10.0),
            top: Length::px(10.0),
            right: Length::px(10.0),
            bottom: Length::px(10.0),
            ..Dimensions::default()
        };
    });

    tree.calculate(root, 100.0, 100.0);

    let child_layout = layout(&tree, child);
    assert_eq!((child_layout.x, child_layout.y, child_layout.width, child_layout.height), (10.0, 10.0, 80.0, 80.0));
}

// ============================================================================
// INCREMENTAL LAYOUT
// ============================================================================

/// Column of 100 wrapping rows with 100 items each
fn massive_tree(propagation: DirtyPropagation) -> (LayoutTree, NodeId, Vec<NodeId>, Vec<NodeId>) {
    let mut tree = LayoutTree::with_config(LayoutConfig { dirty_propagation: propagation, ..LayoutConfig::default() });
    let root = flex_container(&mut tree, 1000.0, 2000.0, FlexDirection::Column);

    let mut rows = Vec::with_capacity(100);
    let mut items = Vec::with_capacity(100 * 100);
    for _ in 0..100 {
        let row = node(&mut tree, Some(root), |s| {
            s.dimensions.display = Display::Flex;
            s.dimensions.width = Length::px(1000.0);
            s.flex.wrap = FlexWrap::Wrap;
        });
        for _ in 0..100 {
            items.push(fixed(&mut tree, row, 10.0, 10.0));
        }
        rows.push(row);
    }
    (tree, root, rows, items)
}

#[test]
fn test_massive_layout() {
    let (mut tree, root, rows, items) = massive_tree(DirtyPropagation::Shallow);
    assert_eq!(tree.len(), 10_101);

    tree.calculate(root, 1000.0, 2000.0);

    assert_eq!(tree.stats().strategies_run, 10_101);
    assert_eq!(layout(&tree, rows[99]).y, 990.0);
    assert_eq!(layout(&tree, rows[99]).height, 10.0);
    let last = layout(&tree, items[9_999]);
    assert_eq!((last.x, last.y), (990.0, 990.0));
}

#[test]
fn test_incremental_edit_with_ancestor_propagation() {
    let (mut tree, root, rows, items) = massive_tree(DirtyPropagation::Ancestors);
    tree.calculate(root, 1000.0, 2000.0);

    if let Some(dims) = tree.dimensions_mut(items[0]) {
        dims.width = Length::px(20.0);
    }
    tree.calculate(root, 1000.0, 2000.0);

    // Root, the edited row and the edited item
    assert_eq!(tree.stats().strategies_run, 3);
    assert_eq!(layout(&tree, rows[0]).height, 20.0);
    assert_eq!(layout(&tree, rows[1]).y, 20.0);
    assert_eq!((layout(&tree, items[99]).x, layout(&tree, items[99]).y), (0.0, 10.0));

    tree.calculate(root, 1000.0, 2000.0);
    assert_eq!(tree.stats().strategies_run, 0);
}

#[test]
fn test_shallow_propagation_misses_deep_edit() {
    let (mut tree, root, rows, items) = massive_tree(DirtyPropagation::Shallow);
    tree.calculate(root, 1000.0, 2000.0);

    if let Some(dims) = tree.dimensions_mut(items[0]) {
        dims.width = Length::px(20.0);
    }
    tree.calculate(root, 1000.0, 2000.0);

    assert_eq!(tree.stats().strategies_run, 0);
    assert_eq!(layout(&tree, rows[0]).height, 10.0);
    assert!(tree.get(items[0]).unwrap().is_dirty());
}

#[test]
fn test_shallow_propagation_sees_direct_children() {
    let (mut tree, root, rows, _) = massive_tree(DirtyPropagation::Shallow);
    tree.calculate(root, 1000.0, 2000.0);

    if let Some(dims) = tree.dimensions_mut(rows[0]) {
        dims.height = Length::px(50.0);
    }
    tree.calculate(root, 1000.0, 2000.0);

    assert_eq!(layout(&tree, rows[0]).height, 50.0);
    assert_eq!(layout(&tree, rows[1]).y, 50.0);
}

/// Flex root holding a padded block container with a paragraph and an inline span
fn nested_page(propagation: DirtyPropagation) -> (LayoutTree, NodeId, NodeId) {
    let mut tree = LayoutTree::with_config(LayoutConfig { dirty_propagation: propagation, ..LayoutConfig::default() });
    let root = flex_container(&mut tree, 800.0, 600.0, FlexDirection::Row);
    let container = node(&mut tree, Some(root), |s| {
        s.dimensions.width = Length::px(600.0);
        s.padding = Edges::all(Length::px(16.0));
    });
    node(&mut tree, Some(container), |s| {
        s.dimensions.height = Length::px(100.0);
        s.margin.top = Length::px(8.0);
        s.margin.bottom = Length::px(8.0);
    });
    let span = node(&mut tree, Some(container), |s| {
        s.dimensions = Dimensions { display: Display::InlineBlock, ..Dimensions::sized(150.0, 20.0) };
    });
    (tree, root, span)
}

#[test]
fn test_ancestor_propagation_reaches_nested_block() {
    let (mut tree, root, span) = nested_page(DirtyPropagation::Ancestors);
    tree.calculate(root, 800.0, 600.0);
    assert_eq!((layout(&tree, span).x, layout(&tree, span).y), (16.0, 132.0));

    if let Some(dims) = tree.dimensions_mut(span) {
        dims.width = Length::px(200.0);
    }
    tree.calculate(root, 800.0, 600.0);

    assert!(tree.stats().strategies_run > 0);
    assert_eq!(layout(&tree, span).width, 200.0);
    assert_eq!((layout(&tree, span).x, layout(&tree, span).y), (16.0, 132.0));
}

#[test]
fn test_shallow_propagation_misses_nested_block() {
    let (mut tree, root, span) = nested_page(DirtyPropagation::Shallow);
    tree.calculate(root, 800.0, 600.0);

    if let Some(dims) = tree.dimensions_mut(span) {
        dims.width = Length::px(200.0);
    }
    tree.calculate(root, 800.0, 600.0);

    assert_eq!(tree.stats().strategies_run, 0);
    assert_eq!(layout(&tree, span).width, 150.0);
}

#[test]
fn test_snapshot_serializes() {
    let mut tree = LayoutTree::new();
    let root = flex_container(&mut tree, 200.0, 100.0, FlexDirection::Row);
    fixed(&mut tree, root, 50.0, 50.0);
    tree.calculate(root, 200.0, 100.0);

    let snapshot = tree.snapshot(root).unwrap();
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["display"], "Flex");
    assert_eq!(json["layout"]["width"], 200.0);
    assert_eq!(json["children"][0]["layout"]["height"], 50.0);

    let restored: LayoutSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(restored, snapshot);
}
