//! Flexbox Layout
//!
//! Implements the CSS Flexbox layout algorithm.
//! https://www.w3.org/TR/css-flexbox-1/

use crate::box_model::EdgeSizes;
use crate::dimensions::clamp_size;
use crate::layout_tree::{LayoutTree, NodeId};
use crate::length::Length;
use crate::style::{AlignContent, AlignItems, Dimensions, Display, Edges, FlexStyle, FlexWrap, JustifyContent};

/// Maps main/cross axis quantities onto physical ones
#[derive(Debug, Clone, Copy)]
struct Axis {
    row: bool,
}

impl Axis {
    fn main(self, width: f32, height: f32) -> f32 {
        if self.row { width } else { height }
    }

    fn cross(self, width: f32, height: f32) -> f32 {
        if self.row { height } else { width }
    }

    /// Physical (width, height) from main/cross sizes
    fn size(self, main: f32, cross: f32) -> (f32, f32) {
        if self.row { (main, cross) } else { (cross, main) }
    }

    fn main_start(self, edges: EdgeSizes) -> f32 {
        if self.row { edges.left } else { edges.top }
    }

    fn main_end(self, edges: EdgeSizes) -> f32 {
        if self.row { edges.right } else { edges.bottom }
    }

    fn cross_start(self, edges: EdgeSizes) -> f32 {
        if self.row { edges.top } else { edges.left }
    }

    fn cross_end(self, edges: EdgeSizes) -> f32 {
        if self.row { edges.bottom } else { edges.right }
    }

    /// Auto flags of (main start, main end, cross start, cross end) margins
    fn auto_margins(self, margin: &Edges) -> [bool; 4] {
        let [top, right, bottom, left] = [margin.top, margin.right, margin.bottom, margin.left].map(Length::is_auto);
        if self.row {
            [left, right, top, bottom]
        } else {
            [top, bottom, left, right]
        }
    }

    /// Declared (min, max) along the main axis
    fn main_limits(self, dims: &Dimensions) -> (Length, Length) {
        if self.row { (dims.min_width, dims.max_width) } else { (dims.min_height, dims.max_height) }
    }

    fn cross_limits(self, dims: &Dimensions) -> (Length, Length) {
        if self.row { (dims.min_height, dims.max_height) } else { (dims.min_width, dims.max_width) }
    }

    fn cross_is_auto(self, dims: &Dimensions) -> bool {
        if self.row { dims.height.is_auto() } else { dims.width.is_auto() }
    }
}

/// A flex item during one container pass
#[derive(Debug)]
struct FlexItem {
    id: NodeId,
    flex: FlexStyle,
    dims: Dimensions,
    /// Resolved margins, auto edges as 0
    margin: EdgeSizes,
    /// Main start, main end, cross start, cross end
    auto_margin: [bool; 4],
    padding_border: EdgeSizes,
    basis: f32,
    /// Main size being resolved
    target: f32,
    frozen: bool,
    cross: f32,
    main_pos: f32,
    cross_pos: f32,
    /// Size the item's children are currently arranged at
    content_size: (f32, f32),
}

impl FlexItem {
    fn main_margin(&self, axis: Axis) -> f32 {
        axis.main_start(self.margin) + axis.main_end(self.margin)
    }

    fn cross_margin(&self, axis: Axis) -> f32 {
        axis.cross_start(self.margin) + axis.cross_end(self.margin)
    }

    fn main_auto_margins(&self) -> usize {
        self.auto_margin[..2].iter().filter(|&&auto| auto).count()
    }

    /// Clamp a main size by min/max and the item's own padding and border
    fn clamp_main(&self, size: f32, axis: Axis, reference: f32) -> f32 {
        let (min, max) = axis.main_limits(&self.dims);
        let floor = axis.main_start(self.padding_border) + axis.main_end(self.padding_border);
        clamp_size(size, min, max, reference, floor)
    }
}

/// A flex line (for wrap); items are `start..end` of the ordered item list
#[derive(Debug, Default)]
struct FlexLine {
    start: usize,
    end: usize,
    /// Bases, main margins and gaps of the line's items
    taken: f32,
    margins: f32,
    gaps: f32,
    auto_margins: usize,
    total_grow: f32,
    total_scaled_shrink: f32,
    cross_size: f32,
}

impl FlexLine {
    fn starting_at(start: usize) -> Self {
        Self { start, end: start, ..Self::default() }
    }

    fn is_empty(&self) -> bool {
        self.start == self.end
    }

    fn push(&mut self, item: &FlexItem, axis: Axis, gap: f32) {
        let margin = item.main_margin(axis);
        self.end += 1;
        self.taken += gap + item.basis + margin;
        self.margins += margin;
        self.gaps += gap;
        self.auto_margins += item.main_auto_margins();
        self.total_grow += item.flex.grow;
        self.total_scaled_shrink += item.flex.shrink * item.basis;
        self.cross_size = self.cross_size.max(item.cross + item.cross_margin(axis));
    }
}

/// Arrange the children of flex container `id`
pub(crate) fn layout_flex(tree: &mut LayoutTree, id: NodeId, available_width: f32, available_height: f32) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let container = node.style;
    let children = node.children.clone();
    let padding_border = node.padding_border(available_width);
    let (mut width, mut height) = (node.layout.width, node.layout.height);

    let flex = container.flex;
    let axis = Axis { row: flex.direction.is_row() };
    let reversed = flex.direction.is_reversed();
    let main_padding = axis.main_start(padding_border) + axis.main_end(padding_border);
    let cross_padding = axis.cross_start(padding_border) + axis.cross_end(padding_border);

    // An auto size offered unconstrained space is sized from the items
    let dims = container.dimensions;
    if dims.width.is_auto() && available_width.is_nan() {
        width = f32::NAN;
    }
    if dims.height.is_auto() && available_height.is_nan() {
        height = f32::NAN;
    }
    let inner_width = inner_size(width, padding_border.horizontal());
    let inner_height = inner_size(height, padding_border.vertical());

    // Partition
    let mut in_flow = Vec::with_capacity(children.len());
    for child in children {
        let Some(child_node) = tree.get(child) else {
            continue;
        };
        if !child_node.position().is_in_flow() {
            if let Some(node) = tree.node_mut(id) {
                node.out_of_flow.push(child);
            }
        } else if child_node.display() == Display::None {
            tree.layout_node(child, inner_width, inner_height);
        } else {
            in_flow.push(child);
        }
    }

    // Stable, so equal orders keep tree order
    in_flow.sort_by_key(|&child| tree.get(child).map_or(0, |c| c.style.flex.order));

    // Hypothetical main sizes
    let mut inner_main = axis.main(inner_width, inner_height);
    let main_gap = if axis.row { flex.gap.column } else { flex.gap.row };
    let main_gap = main_gap.resolve_or_zero(inner_main);

    let mut items = Vec::with_capacity(in_flow.len());
    let mut total_main: f32 = 0.0;
    let mut max_cross: f32 = 0.0;
    for child in in_flow {
        let Some(item) = measure_item(tree, child, axis, inner_width, inner_height) else {
            continue;
        };
        if !items.is_empty() {
            total_main += main_gap;
        }
        total_main += item.basis + item.main_margin(axis);
        max_cross = max_cross.max(item.cross + item.cross_margin(axis));
        items.push(item);
    }

    // Container auto-sizing
    let (main_min, main_max) = axis.main_limits(&container.dimensions);
    let (cross_min, cross_max) = axis.cross_limits(&container.dimensions);
    let main_reference = axis.main(available_width, available_height);
    let cross_reference = axis.cross(available_width, available_height);

    if inner_main.is_nan() {
        let size = clamp_size(total_main + main_padding, main_min, main_max, main_reference, main_padding);
        inner_main = size - main_padding;
        if axis.row { width = size } else { height = size }
    }
    let mut inner_cross = axis.cross(inner_width, inner_height);
    let cross_auto = inner_cross.is_nan();
    if cross_auto {
        let size = clamp_size(max_cross + cross_padding, cross_min, cross_max, cross_reference, cross_padding);
        inner_cross = size - cross_padding;
        if axis.row { height = size } else { width = size }
    }

    let cross_gap = if axis.row { flex.gap.row } else { flex.gap.column };
    let cross_gap = cross_gap.resolve_or_zero(inner_cross);

    // Line breaking
    let mut lines = collect_lines(&items, axis, inner_main, main_gap, flex.wrap.is_wrapping());
    if cross_auto && lines.len() > 1 {
        let content = lines.iter().map(|line| line.cross_size).sum::<f32>() + cross_gap * (lines.len() - 1) as f32;
        let size = clamp_size(content + cross_padding, cross_min, cross_max, cross_reference, cross_padding);
        inner_cross = size - cross_padding;
        if axis.row { height = size } else { width = size }
    }

    tracing::trace!(
        node = %id,
        direction = %flex.direction,
        lines = lines.len(),
        items = items.len(),
        inner_main,
        inner_cross,
        "flex lines"
    );

    let container_main = axis.main(width, height);
    for line in &lines {
        let line_items = &mut items[line.start..line.end];
        resolve_flexible_lengths(line, line_items, axis, inner_main);
        place_main_axis(
            line,
            line_items,
            axis,
            reversed,
            flex.justify_content,
            MainEdges {
                start: axis.main_start(padding_border),
                end: container_main - axis.main_end(padding_border),
                available: inner_main,
                gap: main_gap,
            },
        );
    }

    if !lines.is_empty() {
        align_cross_axis(
            &mut lines,
            &mut items,
            axis,
            &container.flex,
            CrossEdges {
                start: axis.cross_start(padding_border),
                available: inner_cross,
                gap: cross_gap,
            },
        );
    }

    if let Some(node) = tree.node_mut(id) {
        node.layout.width = width;
        node.layout.height = height;
    }

    for item in &items {
        let (item_width, item_height) = axis.size(item.target, item.cross);
        let (x, y) = if axis.row { (item.main_pos, item.cross_pos) } else { (item.cross_pos, item.main_pos) };
        tree.set_local_position(item.id, x, y);
        if let Some(node) = tree.node_mut(item.id) {
            node.layout.width = item_width;
            node.layout.height = item_height;
        }

        if !same_size(item.content_size, (item_width, item_height)) {
            tree.relayout_contents(item.id, item_width, item_height);
        }
    }
}

/// Content-box size, NaN when the border-box size is unresolved
fn inner_size(size: f32, padding_border: f32) -> f32 {
    if size.is_nan() { f32::NAN } else { (size - padding_border).max(0.0) }
}

fn same_size(a: (f32, f32), b: (f32, f32)) -> bool {
    a.0 == b.0 && a.1 == b.1
}

/// Measure a child without its min/max constraints and compute its flex basis.
///
/// A clean child offered the same space as last time reuses its previous
/// measurement.
fn measure_item(tree: &mut LayoutTree, id: NodeId, axis: Axis, inner_width: f32, inner_height: f32) -> Option<FlexItem> {
    let style = *tree.style(id)?;
    let dims = style.dimensions;

    let child_width = if axis.row && dims.width.is_auto() { f32::NAN } else { inner_width };
    let child_height = if !axis.row && dims.height.is_auto() { f32::NAN } else { inner_height };

    let node = tree.get(id)?;
    let cached = node
        .measured
        .filter(|_| node.laid_out_with((child_width, child_height)) && !tree.needs_layout(id));

    let ((width, height), content_size) = match cached {
        Some(measured) => (measured, (node.layout.width, node.layout.height)),
        None => {
            if let Some(node) = tree.node_mut(id) {
                let unconstrained = &mut node.style.dimensions;
                unconstrained.min_width = Length::Auto;
                unconstrained.min_height = Length::Auto;
                unconstrained.max_width = Length::Auto;
                unconstrained.max_height = Length::Auto;
                node.dirty = true;
            }
            tree.layout_node(id, child_width, child_height);

            let node = tree.node_mut(id)?;
            node.style.dimensions = dims;
            let measured = (node.layout.width, node.layout.height);
            node.measured = Some(measured);
            (measured, measured)
        }
    };

    let node = tree.node_mut(id)?;
    let padding_border = node.padding_border(child_width);
    let inner_main = axis.main(inner_width, inner_height);
    let main_size = axis.main(width, height);

    let basis = match style.flex.basis {
        Length::Auto if main_size.is_nan() => 0.0,
        Length::Auto => main_size,
        basis => {
            basis.resolve_or_zero(inner_main) + axis.main_start(padding_border) + axis.main_end(padding_border)
        }
    };
    node.layout.flex_basis = basis;

    Some(FlexItem {
        id,
        flex: style.flex,
        dims,
        margin: style.margin.resolve(inner_width),
        auto_margin: axis.auto_margins(&style.margin),
        padding_border,
        basis,
        target: basis,
        frozen: false,
        cross: axis.cross(width, height),
        main_pos: 0.0,
        cross_pos: 0.0,
        content_size,
    })
}

/// Break ordered items into lines
fn collect_lines(items: &[FlexItem], axis: Axis, available_main: f32, gap: f32, wrap: bool) -> Vec<FlexLine> {
    let mut lines = Vec::new();
    let mut line = FlexLine::starting_at(0);

    for (index, item) in items.iter().enumerate() {
        let outer = item.basis + item.main_margin(axis);
        if wrap && !line.is_empty() && line.taken + gap + outer > available_main {
            lines.push(line);
            line = FlexLine::starting_at(index);
        }
        let gap_before = if line.is_empty() { 0.0 } else { gap };
        line.push(item, axis, gap_before);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Resolve flexible lengths of one line (flexbox §9.7)
fn resolve_flexible_lengths(line: &FlexLine, items: &mut [FlexItem], axis: Axis, available: f32) {
    for item in items.iter_mut() {
        item.target = item.basis;
        item.frozen = false;
    }

    // Main-axis auto margins absorb all free space
    if line.auto_margins > 0 {
        return;
    }

    let remaining = available - line.taken;
    let growing = remaining > 0.0 && line.total_grow > 0.0;
    let shrinking = remaining < 0.0 && line.total_scaled_shrink != 0.0;

    for item in items.iter_mut() {
        if (growing && item.flex.grow == 0.0) || (shrinking && item.flex.shrink == 0.0) {
            item.frozen = true;
        }
    }

    loop {
        let mut frozen_size = 0.0;
        let mut unfrozen_basis = 0.0;
        let mut grow_sum = 0.0;
        let mut scaled_shrink_sum = 0.0;
        for item in items.iter() {
            if item.frozen {
                frozen_size += item.target;
            } else {
                unfrozen_basis += item.basis;
                grow_sum += item.flex.grow;
                scaled_shrink_sum += item.flex.shrink * item.basis;
            }
        }
        let free = available - line.margins - line.gaps - frozen_size - unfrozen_basis;

        let mut froze_any = false;
        for item in items.iter_mut().filter(|item| !item.frozen) {
            let mut size = item.basis;
            if growing && grow_sum > 0.0 {
                size += free * item.flex.grow / grow_sum;
            } else if shrinking && scaled_shrink_sum != 0.0 {
                size += free * item.flex.shrink * item.basis / scaled_shrink_sum;
            }

            let clamped = item.clamp_main(size, axis, available);
            item.target = clamped;
            if clamped != size {
                item.frozen = true;
                froze_any = true;
            }
        }

        if !froze_any {
            break;
        }
    }
}

/// Main-axis geometry of the container
struct MainEdges {
    /// Content start (padding + border)
    start: f32,
    /// Content end, measured from the border-box start
    end: f32,
    available: f32,
    gap: f32,
}

/// Position a line's items along the main axis
fn place_main_axis(
    line: &FlexLine,
    items: &mut [FlexItem],
    axis: Axis,
    reversed: bool,
    justify: JustifyContent,
    edges: MainEdges,
) {
    let used: f32 = items.iter().map(|item| item.target + item.main_margin(axis)).sum::<f32>() + line.gaps;
    let mut remaining = edges.available - used;

    // Auto margins share the space left before flexing
    let mut auto_share = 0.0;
    if line.auto_margins > 0 && remaining > 0.0 {
        auto_share = (edges.available - line.taken) / line.auto_margins as f32;
        remaining = 0.0;
    }

    let count = items.len() as f32;
    let (offset, extra_gap) = match justify {
        JustifyContent::FlexStart => (0.0, 0.0),
        JustifyContent::FlexEnd => (remaining, 0.0),
        JustifyContent::Center => (remaining / 2.0, 0.0),
        JustifyContent::SpaceBetween if count > 1.0 => (0.0, remaining / (count - 1.0)),
        JustifyContent::SpaceBetween => (0.0, 0.0),
        JustifyContent::SpaceAround => (remaining / (2.0 * count), remaining / count),
        JustifyContent::SpaceEvenly => {
            let spacing = remaining / (count + 1.0);
            (spacing, spacing)
        }
    };

    let mut cursor = if reversed { edges.end - offset } else { edges.start + offset };
    for item in items.iter_mut() {
        let margin_start = if item.auto_margin[0] { auto_share } else { axis.main_start(item.margin) };
        let margin_end = if item.auto_margin[1] { auto_share } else { axis.main_end(item.margin) };
        let step = margin_start + item.target + margin_end + edges.gap + extra_gap;

        if reversed {
            item.main_pos = cursor - margin_end - item.target;
            cursor -= step;
        } else {
            item.main_pos = cursor + margin_start;
            cursor += step;
        }
    }
}

/// Cross-axis geometry of the container
struct CrossEdges {
    /// Content start (padding + border)
    start: f32,
    available: f32,
    gap: f32,
}

/// Size lines along the cross axis, then align and stretch items within them
fn align_cross_axis(lines: &mut [FlexLine], items: &mut [FlexItem], axis: Axis, flex: &FlexStyle, edges: CrossEdges) {
    let count = lines.len() as f32;
    let wrap_reverse = flex.wrap == FlexWrap::WrapReverse;

    let mut extra = 0.0;
    if lines.len() == 1 && !edges.available.is_nan() {
        lines[0].cross_size = edges.available;
    } else {
        let total = lines.iter().map(|line| line.cross_size).sum::<f32>() + edges.gap * (count - 1.0);
        extra = (edges.available - total).max(0.0);
    }

    let (mut offset, spacing) = match flex.align_content {
        AlignContent::FlexStart => (0.0, 0.0),
        AlignContent::FlexEnd => (extra, 0.0),
        AlignContent::Center => (extra / 2.0, 0.0),
        AlignContent::SpaceBetween if count > 1.0 => (0.0, extra / (count - 1.0)),
        AlignContent::SpaceBetween => (0.0, 0.0),
        AlignContent::SpaceAround => (extra / (2.0 * count), extra / count),
        AlignContent::SpaceEvenly => {
            let spacing = extra / (count + 1.0);
            (spacing, spacing)
        }
        AlignContent::Stretch => {
            if lines.len() > 1 && extra > 0.0 {
                for line in lines.iter_mut() {
                    line.cross_size += extra / count;
                }
            }
            (0.0, 0.0)
        }
    };

    for line in lines.iter() {
        let line_start = if wrap_reverse {
            edges.start + edges.available - offset - line.cross_size
        } else {
            edges.start + offset
        };

        for item in &mut items[line.start..line.end] {
            align_item(item, axis, flex.align_items, line_start, line.cross_size, edges.available);
        }

        offset += line.cross_size + edges.gap + spacing;
    }
}

/// Stretch and position one item inside its line
fn align_item(item: &mut FlexItem, axis: Axis, align_items: AlignItems, line_start: f32, line_cross: f32, reference: f32) {
    let mut align = item.flex.align_self.unwrap_or(align_items);
    let [.., auto_start, auto_end] = item.auto_margin;
    let mut margin_start = axis.cross_start(item.margin);
    let mut margin_end = axis.cross_end(item.margin);

    if align == AlignItems::Stretch && axis.cross_is_auto(&item.dims) && !auto_start && !auto_end {
        let stretched = line_cross - margin_start - margin_end;
        if stretched > 0.0 {
            let (min, max) = axis.cross_limits(&item.dims);
            let floor = axis.cross_start(item.padding_border) + axis.cross_end(item.padding_border);
            item.cross = clamp_size(stretched, min, max, reference, floor);
        }
    }

    let auto_count = usize::from(auto_start) + usize::from(auto_end);
    if auto_count > 0 {
        let slack = line_cross - item.cross - margin_start - margin_end;
        if slack > 0.0 {
            let share = slack / auto_count as f32;
            if auto_start {
                margin_start = share;
            }
            if auto_end {
                margin_end = share;
            }
        }
        align = AlignItems::FlexStart;
    }

    item.cross_pos = match align {
        AlignItems::FlexStart | AlignItems::Stretch | AlignItems::Baseline => line_start + margin_start,
        AlignItems::FlexEnd => line_start + line_cross - item.cross - margin_end,
        AlignItems::Center => line_start + (line_cross - item.cross) / 2.0 + (margin_start - margin_end) / 2.0,
    };
}
