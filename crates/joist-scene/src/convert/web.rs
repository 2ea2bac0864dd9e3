//! Web view converter: a URL or an inline HTML string.

use joist_schema::Component;

use crate::node::{ControlPrimitive, RenderKind, RenderNode};

pub(crate) fn web(c: &Component) -> RenderNode {
    RenderNode::new(RenderKind::Control(ControlPrimitive::Web {
        url: c.attr_str(&["url", "src"]).map(str::to_string),
        html: c.attr_str(&["html"]).map(str::to_string),
    }))
}
