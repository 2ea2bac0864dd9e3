//! Recursive arrangement: assigns every node an absolute rect, z value
//! and accumulated opacity.
//!
//! Containers with an axis stack children with weighted distribution
//! and per-child cross-axis gravity; containers without an axis hand
//! their children to the relative resolver. Gone children stay in the
//! frame tree with zero footprint so frames and render nodes keep the
//! same shape.

use joist_schema::{EdgeInsets, HAlign, VAlign, ZOrderHint};

use super::context::{LayoutContext, Point};
use super::measure::{self, TextMeasurer, shrink};
use super::relative::{self, RelChild};
use super::weighted::{WeightedChild, distribute};
use super::{Frame, LayoutDiagnostic, LayoutResult, Rect, Size};
use crate::node::{Axis, RenderKind, RenderNode, ScrollPrimitive};

pub(crate) fn run(root: &RenderNode, viewport: Size, m: &dyn TextMeasurer) -> LayoutResult {
    let mut diagnostics = Vec::new();
    let margin = root.margin();
    let avail = Size {
        width: shrink(viewport.width, margin.horizontal()),
        height: shrink(viewport.height, margin.vertical()),
    };
    let size = measure::measure(root, avail, m);
    let rect = Rect::new(margin.left, margin.top, size.width, size.height);
    let mut ctx = LayoutContext::new(Point::ZERO);
    let frame = arrange_node(root, rect, 0.0, &mut ctx, m, &mut diagnostics);
    LayoutResult { root: frame, diagnostics }
}

fn arrange_node(
    node: &RenderNode,
    rect: Rect,
    z_bias: f64,
    ctx: &mut LayoutContext,
    m: &dyn TextMeasurer,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Frame {
    let abs = ctx.place(rect);
    let z = ctx.z(z_bias);
    let opacity = ctx.opacity(node.opacity());

    ctx.push(Point::new(rect.x, rect.y), z_bias, node.opacity());
    let children = match &node.kind {
        RenderKind::Stack(stack) => match stack.axis {
            Some(axis) => {
                arrange_axis(node, &stack.children, axis, stack.spacing, rect, ctx, m, diagnostics)
            }
            None => arrange_relative(node, &stack.children, rect, ctx, m, diagnostics),
        },
        RenderKind::Scroll(scroll) => arrange_scroll(node, scroll, rect, ctx, m, diagnostics),
        _ => Vec::new(),
    };
    ctx.pop();

    Frame { id: node.id.clone(), rect: abs, z, opacity, children }
}

/// Paint-order bias per child from declared z hints: above the named
/// sibling is a +0.5 bias at this depth, below is -0.5.
fn sibling_biases(children: &[RenderNode], diagnostics: &mut Vec<LayoutDiagnostic>) -> Vec<f64> {
    children
        .iter()
        .map(|child| {
            let Some(hint) = child.z_hint() else {
                return 0.0;
            };
            let target = hint.target();
            let known = children
                .iter()
                .any(|s| !std::ptr::eq(s, child) && s.id.as_deref() == Some(target));
            if !known {
                diagnostics
                    .push(LayoutDiagnostic::UnknownZOrderTarget { target: target.to_string() });
                return 0.0;
            }
            match hint {
                ZOrderHint::Above(_) => 0.5,
                ZOrderHint::Below(_) => -0.5,
            }
        })
        .collect()
}

struct Measured {
    size: Size,
    margin: EdgeInsets,
    gone: bool,
}

fn premeasure(children: &[RenderNode], content: Size, m: &dyn TextMeasurer) -> Vec<Measured> {
    children
        .iter()
        .map(|child| {
            let margin = child.margin();
            let gone = child.params.visibility.is_gone();
            let avail = Size {
                width: shrink(content.width, margin.horizontal()),
                height: shrink(content.height, margin.vertical()),
            };
            let size = if gone { Size::ZERO } else { measure::measure(child, avail, m) };
            Measured { size, margin, gone }
        })
        .collect()
}

fn arrange_axis(
    node: &RenderNode,
    children: &[RenderNode],
    axis: Axis,
    spacing: f64,
    rect: Rect,
    ctx: &mut LayoutContext,
    m: &dyn TextMeasurer,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Vec<Frame> {
    let padding = node.padding();
    let content_origin = Point::new(padding.left, padding.top);
    let content = Size {
        width: shrink(rect.width, padding.horizontal()),
        height: shrink(rect.height, padding.vertical()),
    };

    let biases = sibling_biases(children, diagnostics);
    let measured = premeasure(children, content, m);

    let main_avail = main_of(content, axis);
    let extents: Vec<f64> = if main_avail.is_finite() {
        let inputs: Vec<WeightedChild> = children
            .iter()
            .zip(&measured)
            .map(|(child, me)| WeightedChild {
                weight: child.params.weight,
                natural: main_of(me.size, axis) + main_margins(me.margin, axis),
                gone: me.gone,
            })
            .collect();
        distribute(&inputs, spacing, main_avail)
    } else {
        measured
            .iter()
            .map(|me| {
                if me.gone { 0.0 } else { main_of(me.size, axis) + main_margins(me.margin, axis) }
            })
            .collect()
    };

    let mut remaining = measured.iter().filter(|me| !me.gone).count();
    let mut cursor = 0.0f64;
    let mut frames = Vec::with_capacity(children.len());
    for (i, child) in children.iter().enumerate() {
        let me = &measured[i];
        if me.gone {
            frames.push(arrange_node(child, Rect::ZERO, 0.0, ctx, m, diagnostics));
            continue;
        }

        let slot = extents[i];
        let main_size = (slot - main_margins(me.margin, axis)).max(0.0);
        let cross_size = cross_of(me.size, axis);
        let cross_pos = cross_position(child, me, cross_of(content, axis), axis);

        let local = match axis {
            Axis::Horizontal => Rect::new(
                content_origin.x + cursor + me.margin.left,
                content_origin.y + cross_pos,
                main_size,
                cross_size,
            ),
            Axis::Vertical => Rect::new(
                content_origin.x + cross_pos,
                content_origin.y + cursor + me.margin.top,
                cross_size,
                main_size,
            ),
        };
        frames.push(arrange_node(child, local, biases[i], ctx, m, diagnostics));

        remaining -= 1;
        cursor += slot;
        if remaining > 0 {
            cursor += spacing;
        }
    }
    frames
}

/// Cross-axis offset inside the content box, margins applied.
fn cross_position(child: &RenderNode, me: &Measured, cross_avail: f64, axis: Axis) -> f64 {
    let outer = cross_of(me.size, axis) + cross_margins(me.margin, axis);
    let free = if cross_avail.is_finite() { (cross_avail - outer).max(0.0) } else { 0.0 };

    let centered = child.centers_in_parent();
    let offset = match axis {
        Axis::Horizontal => {
            let (_, v) = child.params.gravity.resolved();
            match v {
                _ if centered => free / 2.0,
                VAlign::Top => 0.0,
                VAlign::Center => free / 2.0,
                VAlign::Bottom => free,
            }
        }
        Axis::Vertical => {
            let (h, _) = child.params.gravity.resolved();
            match h {
                _ if centered => free / 2.0,
                HAlign::Left => 0.0,
                HAlign::Center => free / 2.0,
                HAlign::Right => free,
            }
        }
    };
    offset
        + match axis {
            Axis::Horizontal => me.margin.top,
            Axis::Vertical => me.margin.left,
        }
}

fn arrange_relative(
    node: &RenderNode,
    children: &[RenderNode],
    rect: Rect,
    ctx: &mut LayoutContext,
    m: &dyn TextMeasurer,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Vec<Frame> {
    let padding = node.padding();
    let content_origin = Point::new(padding.left, padding.top);
    let content = Size {
        width: shrink(rect.width, padding.horizontal()),
        height: shrink(rect.height, padding.vertical()),
    };

    let biases = sibling_biases(children, diagnostics);
    let measured = premeasure(children, content, m);
    let inputs: Vec<RelChild> = children
        .iter()
        .zip(&measured)
        .map(|(child, me)| RelChild {
            id: child.id.clone(),
            size: me.size,
            margin: me.margin,
            anchors: child.params.anchors.clone(),
            gravity: child.params.gravity,
            gone: me.gone,
        })
        .collect();

    let (rects, rel_diags) = relative::resolve(&inputs, content);
    diagnostics.extend(rel_diags);

    children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            let local = Rect {
                x: content_origin.x + rects[i].x,
                y: content_origin.y + rects[i].y,
                width: rects[i].width,
                height: rects[i].height,
            };
            arrange_node(child, local, biases[i], ctx, m, diagnostics)
        })
        .collect()
}

fn arrange_scroll(
    node: &RenderNode,
    scroll: &ScrollPrimitive,
    rect: Rect,
    ctx: &mut LayoutContext,
    m: &dyn TextMeasurer,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Vec<Frame> {
    // Unbounded along the scroll axes; arrange_axis applies the node's
    // own padding.
    let inner = Rect {
        x: rect.x,
        y: rect.y,
        width: if scroll.horizontal { f64::INFINITY } else { rect.width },
        height: if scroll.vertical { f64::INFINITY } else { rect.height },
    };
    let axis = if scroll.horizontal && !scroll.vertical { Axis::Horizontal } else { Axis::Vertical };
    arrange_axis(node, &scroll.children, axis, scroll.spacing, inner, ctx, m, diagnostics)
}

/// Gravity math shared by the axis helpers.
fn main_of(size: Size, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => size.width,
        Axis::Vertical => size.height,
    }
}

fn cross_of(size: Size, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => size.height,
        Axis::Vertical => size.width,
    }
}

fn main_margins(margin: EdgeInsets, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => margin.horizontal(),
        Axis::Vertical => margin.vertical(),
    }
}

fn cross_margins(margin: EdgeInsets, axis: Axis) -> f64 {
    match axis {
        Axis::Horizontal => margin.vertical(),
        Axis::Vertical => margin.horizontal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HeuristicMeasurer, layout};
    use crate::modifier::{FrameSpec, Modifier};
    use crate::node::StackPrimitive;
    use joist_schema::{Gravity, SizeSpec, Visibility};

    fn fixed_box(id: &str, w: f64, h: f64) -> RenderNode {
        let mut node = RenderNode::new(RenderKind::Shape).with_id(Some(id.to_string()));
        node.modifiers.push(Modifier::Frame(FrameSpec {
            width: SizeSpec::Fixed(w),
            height: SizeSpec::Fixed(h),
            ..FrameSpec::default()
        }));
        node
    }

    fn weighted_box(id: &str, weight: f64) -> RenderNode {
        let mut node = RenderNode::new(RenderKind::Shape).with_id(Some(id.to_string()));
        node.params.weight = weight;
        node
    }

    fn vstack(children: Vec<RenderNode>, spacing: f64) -> RenderNode {
        let mut node = RenderNode::new(RenderKind::Stack(StackPrimitive {
            axis: Some(Axis::Vertical),
            spacing,
            tap_action: None,
            children,
        }));
        node.modifiers.push(Modifier::Frame(FrameSpec {
            width: SizeSpec::MatchParent,
            height: SizeSpec::MatchParent,
            ..FrameSpec::default()
        }));
        node
    }

    fn hstack(children: Vec<RenderNode>, spacing: f64) -> RenderNode {
        let mut node = RenderNode::new(RenderKind::Stack(StackPrimitive {
            axis: Some(Axis::Horizontal),
            spacing,
            tap_action: None,
            children,
        }));
        node.modifiers.push(Modifier::Frame(FrameSpec {
            width: SizeSpec::MatchParent,
            height: SizeSpec::MatchParent,
            ..FrameSpec::default()
        }));
        node
    }

    const VIEWPORT: Size = Size { width: 200.0, height: 400.0 };

    #[test]
    fn test_row_with_fixed_and_weighted_child() {
        let root = hstack(vec![fixed_box("a", 50.0, 40.0), weighted_box("b", 1.0)], 10.0);
        let result = layout(&root, VIEWPORT, &HeuristicMeasurer);
        let a = result.root.find("a").unwrap();
        let b = result.root.find("b").unwrap();
        assert_eq!(a.rect, Rect::new(0.0, 0.0, 50.0, 40.0));
        // 200 - 50 - 10 spacing = 140 for the weighted child.
        assert_eq!(b.rect.x, 60.0);
        assert_eq!(b.rect.width, 140.0);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_gone_child_frees_space_and_spacing() {
        let mut hidden = fixed_box("hidden", 50.0, 40.0);
        hidden.params.visibility = Visibility::Gone;
        let root = hstack(
            vec![fixed_box("a", 50.0, 40.0), hidden, weighted_box("b", 1.0)],
            10.0,
        );
        let result = layout(&root, VIEWPORT, &HeuristicMeasurer);
        assert_eq!(result.root.find("hidden").unwrap().rect, Rect::ZERO);
        let b = result.root.find("b").unwrap();
        assert_eq!(b.rect.width, 140.0);
        assert_eq!(b.rect.x, 60.0);
    }

    #[test]
    fn test_invisible_child_keeps_footprint_without_paint() {
        let mut ghost = fixed_box("ghost", 50.0, 40.0);
        ghost.modifiers.push(Modifier::Opacity(0.0));
        let root = hstack(vec![ghost, weighted_box("b", 1.0)], 10.0);
        let result = layout(&root, VIEWPORT, &HeuristicMeasurer);
        let ghost = result.root.find("ghost").unwrap();
        assert_eq!(ghost.rect.width, 50.0);
        assert_eq!(ghost.opacity, 0.0);
        assert_eq!(result.root.find("b").unwrap().rect.width, 140.0);
    }

    #[test]
    fn test_vertical_stack_cross_gravity() {
        let mut right = fixed_box("right", 60.0, 20.0);
        right.params.gravity = Gravity::parse(&serde_json::json!("right"));
        let mut center = fixed_box("center", 60.0, 20.0);
        center.params.gravity = Gravity::parse(&serde_json::json!("centerHorizontal"));
        let root = vstack(vec![fixed_box("left", 60.0, 20.0), right, center], 0.0);
        let result = layout(&root, VIEWPORT, &HeuristicMeasurer);
        assert_eq!(result.root.find("left").unwrap().rect.x, 0.0);
        assert_eq!(result.root.find("right").unwrap().rect.x, 140.0);
        assert_eq!(result.root.find("center").unwrap().rect.x, 70.0);
    }

    #[test]
    fn test_margins_consume_main_axis_and_offset_position() {
        let mut boxed = fixed_box("m", 50.0, 30.0);
        boxed.modifiers.push(Modifier::Margin(EdgeInsets {
            top: 5.0,
            right: 0.0,
            bottom: 7.0,
            left: 0.0,
        }));
        let root = vstack(vec![boxed, fixed_box("n", 50.0, 30.0)], 0.0);
        let result = layout(&root, VIEWPORT, &HeuristicMeasurer);
        assert_eq!(result.root.find("m").unwrap().rect.y, 5.0);
        // 5 + 30 + 7 margin-box, then the next child.
        assert_eq!(result.root.find("n").unwrap().rect.y, 42.0);
    }

    #[test]
    fn test_padding_insets_children() {
        let mut root = vstack(vec![fixed_box("a", 50.0, 30.0)], 0.0);
        root.modifiers.insert(0, Modifier::Padding(EdgeInsets::all(12.0)));
        let result = layout(&root, VIEWPORT, &HeuristicMeasurer);
        let a = result.root.find("a").unwrap();
        assert_eq!((a.rect.x, a.rect.y), (12.0, 12.0));
    }

    #[test]
    fn test_relative_container_positions_by_anchors() {
        let mut badge = fixed_box("badge", 40.0, 40.0);
        badge.params.anchors.right = true;
        badge.params.anchors.top = true;
        let mut centered = fixed_box("middle", 80.0, 80.0);
        centered.params.anchors.center_in_parent = true;
        let mut root = RenderNode::new(RenderKind::Stack(StackPrimitive {
            axis: None,
            spacing: 0.0,
            tap_action: None,
            children: vec![badge, centered],
        }));
        root.modifiers.push(Modifier::Frame(FrameSpec {
            width: SizeSpec::MatchParent,
            height: SizeSpec::MatchParent,
            ..FrameSpec::default()
        }));
        let result = layout(&root, VIEWPORT, &HeuristicMeasurer);
        assert_eq!(result.root.find("badge").unwrap().rect.x, 160.0);
        assert_eq!(result.root.find("middle").unwrap().rect, Rect::new(60.0, 160.0, 80.0, 80.0));
    }

    #[test]
    fn test_anchor_cycle_surfaces_diagnostic() {
        let mut a = fixed_box("a", 40.0, 40.0);
        a.params.anchors.right_of = Some("b".to_string());
        let mut b = fixed_box("b", 40.0, 40.0);
        b.params.anchors.right_of = Some("a".to_string());
        let root = RenderNode::new(RenderKind::Stack(StackPrimitive {
            axis: None,
            spacing: 0.0,
            tap_action: None,
            children: vec![a, b],
        }));
        let result = layout(&root, VIEWPORT, &HeuristicMeasurer);
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| matches!(d, LayoutDiagnostic::ConstraintCycle { .. }))
        );
    }

    #[test]
    fn test_z_hint_lifts_sibling_above_target() {
        let mut under = fixed_box("under", 100.0, 100.0);
        under.modifiers.push(Modifier::ZOrder(ZOrderHint::Below("over".to_string())));
        let over = fixed_box("over", 100.0, 100.0);
        let root = RenderNode::new(RenderKind::Stack(StackPrimitive {
            axis: None,
            spacing: 0.0,
            tap_action: None,
            children: vec![under, over],
        }));
        let result = layout(&root, VIEWPORT, &HeuristicMeasurer);
        let under = result.root.find("under").unwrap();
        let over = result.root.find("over").unwrap();
        assert!(under.z < over.z);
    }

    #[test]
    fn test_unknown_z_target_reports() {
        let mut stray = fixed_box("stray", 10.0, 10.0);
        stray.modifiers.push(Modifier::ZOrder(ZOrderHint::Above("nobody".to_string())));
        let root = vstack(vec![stray], 0.0);
        let result = layout(&root, VIEWPORT, &HeuristicMeasurer);
        assert_eq!(
            result.diagnostics,
            vec![LayoutDiagnostic::UnknownZOrderTarget { target: "nobody".to_string() }]
        );
    }

    #[test]
    fn test_scroll_lets_content_overflow() {
        let children = (0..10).map(|i| fixed_box(&format!("c{i}"), 50.0, 100.0)).collect();
        let mut scroll = RenderNode::new(RenderKind::Scroll(ScrollPrimitive {
            horizontal: false,
            vertical: true,
            spacing: 0.0,
            children,
        }));
        scroll.modifiers.push(Modifier::Frame(FrameSpec {
            width: SizeSpec::MatchParent,
            height: SizeSpec::Fixed(300.0),
            ..FrameSpec::default()
        }));
        let result = layout(&scroll, VIEWPORT, &HeuristicMeasurer);
        assert_eq!(result.root.rect.height, 300.0);
        let last = result.root.find("c9").unwrap();
        assert_eq!(last.rect.y, 900.0);
    }

    #[test]
    fn test_nested_offsets_accumulate_absolutely() {
        let mut inner = vstack(vec![fixed_box("leaf", 10.0, 10.0)], 0.0);
        inner.modifiers.insert(0, Modifier::Padding(EdgeInsets::all(5.0)));
        let mut outer = vstack(vec![inner], 0.0);
        outer.modifiers.insert(0, Modifier::Padding(EdgeInsets::all(20.0)));
        let result = layout(&outer, VIEWPORT, &HeuristicMeasurer);
        let leaf = result.root.find("leaf").unwrap();
        assert_eq!((leaf.rect.x, leaf.rect.y), (25.0, 25.0));
    }
}
