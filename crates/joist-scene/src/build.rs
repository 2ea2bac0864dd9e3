//! Turns a decoded [`Component`] tree into a [`RenderNode`] tree.
//!
//! One converter per component tag. Most tags get the generic modifier
//! chain applied here; containers and text-bearing widgets manage their
//! own chain because they make chain decisions (padding suppression,
//! default chrome) that depend on the tag.

use std::collections::HashMap;

use joist_schema::{Component, HAlign, StateStore, StateValue, VAlign, Visibility, interpolate};
use tracing::trace;

use crate::convert;
use crate::modifier::{Modifier, modifier_chain};
use crate::node::{Axis, RenderNode};

/// Shared inputs for one build pass over a screen.
pub struct BuildContext<'a> {
    pub state: &'a StateStore,
    /// Screen-scoped data that shadows the store during interpolation.
    pub request: Option<&'a HashMap<String, StateValue>>,
    /// Font size for components that declare none.
    pub base_font_size: f64,
}

impl<'a> BuildContext<'a> {
    pub fn new(state: &'a StateStore) -> BuildContext<'a> {
        BuildContext { state, request: None, base_font_size: crate::convert::DEFAULT_FONT_SIZE }
    }

    pub fn with_request(
        state: &'a StateStore,
        request: &'a HashMap<String, StateValue>,
    ) -> BuildContext<'a> {
        BuildContext {
            state,
            request: Some(request),
            base_font_size: crate::convert::DEFAULT_FONT_SIZE,
        }
    }

    pub fn base_font_size(mut self, size: f64) -> BuildContext<'a> {
        self.base_font_size = size;
        self
    }

    /// Expands `@{name}` references in a declared string.
    pub fn text(&self, raw: &str) -> String {
        interpolate(raw, self.request, self.state)
    }
}

/// Builds the render tree for a screen root.
pub fn build_node(c: &Component, ctx: &BuildContext) -> RenderNode {
    build_child(c, None, ctx)
}

pub(crate) fn build_child(
    c: &Component,
    parent_axis: Option<Axis>,
    ctx: &BuildContext,
) -> RenderNode {
    let tag = canonical_tag(&c.kind);
    trace!(tag = %tag, id = ?c.id, "building node");

    let (mut node, own_chain) = dispatch(&tag, c, ctx);
    node.id = c.id.clone();
    node.params.weight = c.weight.max(0.0);
    node.params.gravity = c.gravity;
    node.params.anchors = c.anchors.clone();
    node.params.visibility = c.visibility;

    if !own_chain {
        node.modifiers = modifier_chain(c, false);
    }

    if let Some(axis) = parent_axis {
        fold_cross_anchors(&mut node, axis);
    }

    // Outermost layer: the visibility veil. Gone nodes usually carry a
    // zero opacity from their own chain already, so only top up when
    // something upstream left them paintable.
    match c.visibility {
        Visibility::Invisible => node.modifiers.push(Modifier::Opacity(0.0)),
        Visibility::Gone => {
            if node.opacity() > 0.0 {
                node.modifiers.push(Modifier::Opacity(0.0));
            }
        }
        Visibility::Visible => {}
    }

    node
}

/// Lowercases and strips separators so `Network-Image`, `networkImage`
/// and `network_image` all land on one converter.
fn canonical_tag(kind: &str) -> String {
    kind.chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// Picks the converter for a tag. The flag says whether the converter
/// produced its own modifier chain; when `false` the caller applies the
/// generic one.
fn dispatch(tag: &str, c: &Component, ctx: &BuildContext) -> (RenderNode, bool) {
    match tag {
        "view" => (convert::container::view(c, ctx), true),
        "safeareaview" | "safearea" => (convert::container::safe_area(c, ctx), true),
        "scroll" | "scrollview" => (convert::container::scroll(c, ctx), true),
        "gradientview" | "gradient" => (convert::container::view(c, ctx), true),
        "blur" | "blurview" => (convert::container::blur(c, ctx), true),
        "label" | "text" | "textlabel" => (convert::text::label(c, ctx), true),
        "button" => (convert::button::button(c, ctx), true),
        "textfield" => (convert::field::text_field(c, ctx), true),
        "textview" => (convert::field::text_view(c, ctx), true),
        "image" | "imageview" => (convert::image::image(c, ctx), true),
        "networkimage" | "circleimage" => (convert::image::network_image(c, ctx), true),
        "selectbox" | "select" | "picker" => (convert::select::select_box(c, ctx), true),
        "switch" | "toggle" => (convert::controls::toggle(c, ctx), false),
        "check" | "checkbox" => (convert::controls::checkbox(c, ctx), false),
        "radio" | "radiobutton" => (convert::controls::radio(c, ctx), false),
        "slider" => (convert::controls::slider(c, ctx), false),
        "progress" | "progressbar" | "circleprogress" => {
            (convert::controls::progress(c, tag), false)
        }
        "indicator" | "activityindicator" | "spinner" => (convert::controls::spinner(), false),
        "iconlabel" => (convert::composite::icon_label(c, ctx), false),
        "collection" | "collectionview" | "grid" => {
            (convert::collection::collection(c, ctx), false)
        }
        "table" | "tableview" | "list" => (convert::collection::table(c, ctx), false),
        "tab" | "tabview" => (convert::tab::tab(c, ctx), false),
        "web" | "webview" => (convert::web::web(c), false),
        _ => (convert::placeholder::unknown(c), true),
    }
}

/// Stack parents place children on the cross axis by gravity. Anchor
/// flags that point across the axis are alignment requests too, so they
/// fold into gravity here; declared gravity wins on conflict.
fn fold_cross_anchors(node: &mut RenderNode, parent_axis: Axis) {
    let anchors = &node.params.anchors;
    match parent_axis {
        Axis::Horizontal => {
            if node.params.gravity.vertical.is_none() {
                node.params.gravity.vertical =
                    if anchors.center_vertical || anchors.center_in_parent {
                        Some(VAlign::Center)
                    } else if anchors.bottom {
                        Some(VAlign::Bottom)
                    } else if anchors.top {
                        Some(VAlign::Top)
                    } else {
                        None
                    };
            }
        }
        Axis::Vertical => {
            if node.params.gravity.horizontal.is_none() {
                node.params.gravity.horizontal =
                    if anchors.center_horizontal || anchors.center_in_parent {
                        Some(HAlign::Center)
                    } else if anchors.right {
                        Some(HAlign::Right)
                    } else if anchors.left {
                        Some(HAlign::Left)
                    } else {
                        None
                    };
            }
        }
    }
}
