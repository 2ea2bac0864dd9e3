//! Icon-plus-label composite. With a click handler it degrades to a
//! button carrying an icon slot; otherwise it expands into a small
//! horizontal stack the layout treats like any other.

use joist_schema::{Component, SizeSpec};

use crate::build::BuildContext;
use crate::convert::{button, font_size, text_color};
use crate::modifier::{FrameSpec, Modifier};
use crate::node::{
    Axis, ContentMode, ControlPrimitive, ImagePrimitive, ImageSource, RenderKind, RenderNode,
    StackPrimitive, TextPrimitive,
};

const ICON_GAP: f64 = 6.0;

pub(crate) fn icon_label(c: &Component, ctx: &BuildContext) -> RenderNode {
    let raw = c.attr_str(&["text", "title", "label"]).unwrap_or("");
    let text = ctx.text(raw);
    let icon = button::icon_name(c);

    if c.events.on_click.is_some() {
        return RenderNode::new(RenderKind::Control(ControlPrimitive::Button {
            label: text,
            icon,
            action: c.events.on_click.clone(),
            font_size: c.attr_f64(&["fontSize", "font_size"]),
            text_color: text_color(c),
        }));
    }

    let size = font_size(c, ctx);
    let mut children = Vec::new();
    if let Some(icon) = icon {
        let mut glyph = RenderNode::new(RenderKind::Image(ImagePrimitive {
            source: ImageSource::Asset(icon),
            content_mode: ContentMode::Fit,
        }));
        glyph.modifiers.push(Modifier::Frame(FrameSpec {
            width: SizeSpec::Fixed(size),
            height: SizeSpec::Fixed(size),
            ..FrameSpec::default()
        }));
        children.push(glyph);
    }
    let mut primitive = TextPrimitive::new(text, size);
    if let Some(color) = text_color(c) {
        primitive.color = color;
    }
    children.push(RenderNode::new(RenderKind::Text(primitive)));

    RenderNode::new(RenderKind::Stack(StackPrimitive {
        axis: Some(Axis::Horizontal),
        spacing: ICON_GAP,
        tap_action: None,
        children,
    }))
}
