//! Editable text converters. Both resolve a scalar binding from the
//! component id so the runtime can write keystrokes back to the store.

use joist_schema::{BindingKind, Component};

use crate::build::BuildContext;
use crate::convert::{binding_for, field_chrome, font_size};
use crate::node::{ControlPrimitive, RenderKind, RenderNode};

pub(crate) fn text_field(c: &Component, ctx: &BuildContext) -> RenderNode {
    let binding = binding_for(c, BindingKind::Scalar, ctx);
    let text = binding
        .as_ref()
        .and_then(|b| b.text_value(ctx.state))
        .unwrap_or_else(|| ctx.text(c.attr_str(&["text"]).unwrap_or("")));
    let primitive = ControlPrimitive::TextField {
        binding,
        text,
        hint: hint(c, ctx),
        secure: c
            .attr_bool(&["secure", "secureTextEntry", "secure_text_entry"])
            .unwrap_or(false),
        font_size: font_size(c, ctx),
        on_change: c.events.on_change.clone(),
        on_submit: c.events.on_submit.clone(),
    };

    let mut node = RenderNode::new(RenderKind::Control(primitive));
    node.modifiers = field_chrome(c);
    node
}

pub(crate) fn text_view(c: &Component, ctx: &BuildContext) -> RenderNode {
    let binding = binding_for(c, BindingKind::Scalar, ctx);
    let text = binding
        .as_ref()
        .and_then(|b| b.text_value(ctx.state))
        .unwrap_or_else(|| ctx.text(c.attr_str(&["text"]).unwrap_or("")));
    let primitive = ControlPrimitive::TextView {
        binding,
        text,
        hint: hint(c, ctx),
        font_size: font_size(c, ctx),
        on_change: c.events.on_change.clone(),
    };

    let mut node = RenderNode::new(RenderKind::Control(primitive));
    node.modifiers = field_chrome(c);
    node
}

fn hint(c: &Component, ctx: &BuildContext) -> Option<String> {
    c.attr_str(&["hint", "placeholder"]).map(|raw| ctx.text(raw))
}
