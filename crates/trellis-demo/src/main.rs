//! Trellis Demo - builds a small page, lays it out and edits it incrementally

use std::time::Instant;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use trellis_layout::{
    Dimensions, DirtyPropagation, Display, Edges, FlexStyle, FlexWrap, LayoutConfig, LayoutSnapshot, LayoutTree, Length,
    NodeId, Position, Style,
};

const VIEWPORT: (f32, f32) = (1920.0, 1080.0);

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // The span is a grandchild of the root
    let mut tree = LayoutTree::with_config(LayoutConfig {
        dirty_propagation: DirtyPropagation::Ancestors,
        ..LayoutConfig::with_viewport(VIEWPORT.0, VIEWPORT.1)
    });
    let page = build_page(&mut tree)?;

    let start = Instant::now();
    tree.calculate(page.root, VIEWPORT.0, VIEWPORT.1);
    tracing::info!(elapsed = ?start.elapsed(), stats = ?tree.stats(), "initial layout");
    print_tree(&tree, page.root)?;

    // Nothing changed, so every strategy is skipped
    let start = Instant::now();
    tree.calculate(page.root, VIEWPORT.0, VIEWPORT.1);
    tracing::info!(elapsed = ?start.elapsed(), stats = ?tree.stats(), "clean relayout");

    let span = tree.dimensions_mut(page.span).context("span was removed")?;
    span.width = Length::px(200.0);
    tree.calculate(page.root, VIEWPORT.0, VIEWPORT.1);
    tracing::info!(stats = ?tree.stats(), "span widened");
    print_tree(&tree, page.root)?;

    tree.remove_node(page.span)?;
    tree.calculate(page.root, VIEWPORT.0, VIEWPORT.1);
    tracing::info!(stats = ?tree.stats(), "span removed");

    let snapshot = tree.snapshot(page.root).context("root was removed")?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}

struct Page {
    root: NodeId,
    span: NodeId,
}

/// A wrapping flex root holding a padded container, a paragraph, an inline
/// span and a fixed banner.
fn build_page(tree: &mut LayoutTree) -> anyhow::Result<Page> {
    let root = tree.create_node_with_style(Style {
        dimensions: Dimensions { display: Display::Flex, ..Dimensions::sized(800.0, 600.0) },
        flex: FlexStyle { wrap: FlexWrap::Wrap, ..FlexStyle::default() },
        ..Style::default()
    });

    let container = tree.create_node_with_style(Style {
        dimensions: Dimensions { width: Length::px(600.0), ..Dimensions::default() },
        padding: Edges::all(Length::px(16.0)),
        ..Style::default()
    });
    tree.append_child(root, container)?;

    let paragraph = tree.create_node_with_style(Style {
        dimensions: Dimensions { height: Length::px(100.0), ..Dimensions::default() },
        margin: Edges::new(Length::px(8.0), Length::ZERO, Length::px(8.0), Length::ZERO),
        ..Style::default()
    });
    tree.append_child(container, paragraph)?;

    let span = tree.create_node_with_style(Style {
        dimensions: Dimensions { display: Display::InlineBlock, ..Dimensions::sized(150.0, 20.0) },
        ..Style::default()
    });
    tree.append_child(container, span)?;

    let banner = tree.create_node_with_style(Style {
        dimensions: Dimensions {
            position: Position::Fixed,
            width: Length::percent(100.0),
            height: Length::px(40.0),
            bottom: Length::ZERO,
            left: Length::ZERO,
            ..Dimensions::default()
        },
        ..Style::default()
    });
    tree.append_child(root, banner)?;

    Ok(Page { root, span })
}

fn print_tree(tree: &LayoutTree, root: NodeId) -> anyhow::Result<()> {
    let snapshot = tree.snapshot(root).context("root was removed")?;
    print_node(&snapshot, 0);
    Ok(())
}

fn print_node(node: &LayoutSnapshot, depth: usize) {
    let layout = &node.layout;
    println!(
        "{:indent$}{} {} ({}) at ({}, {}) size {}x{}",
        "",
        node.id,
        node.display,
        node.position,
        layout.x,
        layout.y,
        layout.width,
        layout.height,
        indent = depth * 2
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
