//! Button converter. Buttons ship a tinted rounded default skin that
//! declared attributes override piecewise.

use joist_schema::{Component, EdgeInsets};

use crate::build::BuildContext;
use crate::color::Rgba;
use crate::convert::text_color;
use crate::modifier::{Fill, FrameSpec, Modifier, background_fill, chain_tail};
use crate::node::{ControlPrimitive, RenderKind, RenderNode};

const BUTTON_PADDING: EdgeInsets = EdgeInsets { top: 10.0, right: 20.0, bottom: 10.0, left: 20.0 };
const BUTTON_CORNER: f64 = 8.0;
/// System tint, #007AFF.
const BUTTON_TINT: Rgba = Rgba { r: 0.0, g: 0.478, b: 1.0, a: 1.0 };

pub(crate) fn button(c: &Component, ctx: &BuildContext) -> RenderNode {
    let raw = c.attr_str(&["text", "title", "label"]).unwrap_or("Button");
    let primitive = ControlPrimitive::Button {
        label: ctx.text(raw),
        icon: icon_name(c),
        action: c.events.on_click.clone(),
        font_size: c.attr_f64(&["fontSize", "font_size"]),
        text_color: text_color(c).or(Some(Rgba::WHITE)),
    };

    let mut node = RenderNode::new(RenderKind::Control(primitive));
    node.modifiers = chrome(c);
    node
}

pub(crate) fn icon_name(c: &Component) -> Option<String> {
    c.attr_str(&["icon", "iconName", "icon_name", "iconSrc", "icon_src"])
        .map(str::to_string)
}

fn chrome(c: &Component) -> Vec<Modifier> {
    let mut chain = Vec::new();

    let padding = if c.padding.is_zero() { BUTTON_PADDING } else { c.padding };
    chain.push(Modifier::Padding(padding));

    let frame = FrameSpec::of(c);
    if !frame.is_default() {
        chain.push(Modifier::Frame(frame));
    }

    let fill = background_fill(c).unwrap_or(Fill::Solid(BUTTON_TINT));
    chain.push(Modifier::Background(fill));

    let radius = if c.corner_radius > 0.0 { c.corner_radius } else { BUTTON_CORNER };
    chain.push(Modifier::CornerRadius { radius, clip: true });

    if let Some(width) = c.border_width.filter(|w| *w > 0.0) {
        let color = c
            .border_color
            .as_deref()
            .and_then(Rgba::parse)
            .unwrap_or(Rgba::BLACK);
        chain.push(Modifier::Border { width, color });
    }

    chain.extend(chain_tail(c));
    chain
}
