//! View-family converters: plain boxes, safe-area roots, scrolls and
//! blur panels. These own the relative-versus-stacked decision and
//! therefore build their own modifier chains.

use joist_schema::{AnchorSpec, Component, EdgeInsets, Orientation};
use tracing::debug;

use crate::build::{BuildContext, build_child};
use crate::modifier::{Modifier, modifier_chain};
use crate::node::{Axis, RenderKind, RenderNode, ScrollPrimitive, StackPrimitive};

/// Static safe-area insets for a notched portrait phone. A windowing
/// backend would substitute the real values.
const SAFE_AREA: EdgeInsets = EdgeInsets { top: 47.0, right: 0.0, bottom: 34.0, left: 0.0 };

pub(crate) fn view(c: &Component, ctx: &BuildContext) -> RenderNode {
    let axis = stack_axis(c);
    let relative = axis.is_none() && !c.children.is_empty();
    let children: Vec<RenderNode> =
        c.children.iter().map(|child| build_child(child, axis, ctx)).collect();

    let kind = if children.is_empty() && c.events.on_click.is_none() {
        RenderKind::Shape
    } else {
        RenderKind::Stack(StackPrimitive {
            axis,
            spacing: c.spacing,
            tap_action: c.events.on_click.clone(),
            children,
        })
    };

    let mut node = RenderNode::new(kind);
    // Relative containers measure child offsets against the full
    // bounds, so declared padding moves to the children, not the box.
    node.modifiers = modifier_chain(c, relative);
    node
}

pub(crate) fn safe_area(c: &Component, ctx: &BuildContext) -> RenderNode {
    let mut node = view(c, ctx);
    node.modifiers.insert(0, Modifier::Padding(SAFE_AREA));
    node
}

pub(crate) fn scroll(c: &Component, ctx: &BuildContext) -> RenderNode {
    let horizontal = matches!(c.orientation, Some(Orientation::Horizontal))
        || c.attr_bool(&["horizontalScroll", "horizontal_scroll"]).unwrap_or(false);
    let axis = if horizontal { Axis::Horizontal } else { Axis::Vertical };
    let children: Vec<RenderNode> =
        c.children.iter().map(|child| build_child(child, Some(axis), ctx)).collect();

    let mut node = RenderNode::new(RenderKind::Scroll(ScrollPrimitive {
        horizontal,
        vertical: !horizontal,
        spacing: c.spacing,
        children,
    }));
    node.modifiers = modifier_chain(c, false);
    node
}

pub(crate) fn blur(c: &Component, ctx: &BuildContext) -> RenderNode {
    let radius = c.attr_f64(&["blurRadius", "blur_radius", "radius"]).unwrap_or(10.0);
    let mut node = view(c, ctx);
    // The blur sits with the background layer, under any border.
    let at = node
        .modifiers
        .iter()
        .position(|m| matches!(m, Modifier::Background(_)))
        .map(|i| i + 1)
        .unwrap_or(0);
    node.modifiers.insert(at, Modifier::Blur(radius.max(0.0)));
    node
}

/// Declared orientation, dropped to relative mode when any child's
/// anchors fight the stacking direction.
fn stack_axis(c: &Component) -> Option<Axis> {
    let axis = match c.orientation {
        Some(Orientation::Horizontal) => Axis::Horizontal,
        Some(Orientation::Vertical) => Axis::Vertical,
        None => return None,
    };
    if c.children.iter().any(|child| conflicts(axis, &child.anchors)) {
        debug!(id = ?c.id, "child anchors conflict with the stack axis, using relative placement");
        return None;
    }
    Some(axis)
}

fn conflicts(axis: Axis, anchors: &AnchorSpec) -> bool {
    match axis {
        Axis::Vertical => {
            anchors.top
                || anchors.bottom
                || anchors.center_vertical
                || anchors.above.is_some()
                || anchors.below.is_some()
        }
        Axis::Horizontal => {
            anchors.left
                || anchors.right
                || anchors.center_horizontal
                || anchors.left_of.is_some()
                || anchors.right_of.is_some()
        }
    }
}
