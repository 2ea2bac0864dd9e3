//! Image converters: bundled assets and remote fetches.

use joist_schema::Component;
use tracing::debug;

use crate::build::BuildContext;
use crate::modifier::modifier_chain;
use crate::node::{ContentMode, ImagePrimitive, ImageSource, RenderKind, RenderNode};

pub(crate) fn image(c: &Component, ctx: &BuildContext) -> RenderNode {
    let name = c
        .attr_str(&["src", "srcName", "src_name", "image", "name"])
        .map(|raw| ctx.text(raw))
        .unwrap_or_default();
    if name.is_empty() {
        debug!(id = ?c.id, "image without a source renders as an empty box");
    }
    make(c, ImageSource::Asset(name))
}

pub(crate) fn network_image(c: &Component, ctx: &BuildContext) -> RenderNode {
    let url = c
        .attr_str(&["url", "src", "source"])
        .map(|raw| ctx.text(raw))
        .unwrap_or_default();
    let placeholder = c
        .attr_str(&["placeholder", "placeholderImage", "placeholder_image", "defaultImage"])
        .map(str::to_string);
    make(c, ImageSource::Remote { url, placeholder })
}

fn make(c: &Component, source: ImageSource) -> RenderNode {
    let primitive = ImagePrimitive { source, content_mode: content_mode(c) };
    let mut node = RenderNode::new(RenderKind::Image(primitive));
    node.modifiers = modifier_chain(c, false);
    node
}

fn content_mode(c: &Component) -> ContentMode {
    match c
        .attr_str(&["contentMode", "content_mode", "scaleType", "scale_type"])
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some(m) if m.contains("fill") || m.contains("crop") => ContentMode::Fill,
        Some(m) if m.contains("center") => ContentMode::Center,
        _ => ContentMode::Fit,
    }
}
