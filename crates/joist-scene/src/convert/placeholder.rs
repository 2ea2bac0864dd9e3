//! Fallback for unrecognized tags: a loud red box naming the tag, so a
//! typo in a document shows up on screen instead of silently vanishing.

use joist_schema::{Component, EdgeInsets};
use tracing::warn;

use crate::color::Rgba;
use crate::modifier::{Modifier, chain_tail};
use crate::node::{RenderKind, RenderNode, TextPrimitive};

pub(crate) fn unknown(c: &Component) -> RenderNode {
    warn!(tag = %c.kind, id = ?c.id, "unrecognized component type");

    let mut primitive = TextPrimitive::new(format!("Unknown type: {}", c.kind), 12.0);
    primitive.color = Rgba::RED;

    let mut node = RenderNode::new(RenderKind::Text(primitive));
    node.modifiers.push(Modifier::Padding(EdgeInsets::all(6.0)));
    node.modifiers.push(Modifier::Border { width: 2.0, color: Rgba::RED });
    // Margins and visibility still apply so the surrounding layout
    // keeps its shape.
    node.modifiers.extend(chain_tail(c));
    node
}
