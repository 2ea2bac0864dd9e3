//! Label converter.

use joist_schema::Component;

use crate::build::BuildContext;
use crate::convert::{font_size, max_lines, text_color};
use crate::modifier::modifier_chain;
use crate::node::{RenderKind, RenderNode, TextPrimitive};

pub(crate) fn label(c: &Component, ctx: &BuildContext) -> RenderNode {
    let raw = c.attr_str(&["text", "title"]).unwrap_or("");
    let mut primitive = TextPrimitive::new(ctx.text(raw), font_size(c, ctx));
    if let Some(color) = text_color(c) {
        primitive.color = color;
    }
    primitive.max_lines = max_lines(c);

    let mut node = RenderNode::new(RenderKind::Text(primitive));
    node.modifiers = modifier_chain(c, false);
    node
}
