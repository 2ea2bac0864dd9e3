//! Small stateful controls: toggles, checks, radios, sliders and
//! progress indicators. These take the generic modifier chain; only
//! their primitives are custom.

use joist_schema::{BindingKind, Component};

use crate::build::BuildContext;
use crate::convert::binding_for;
use crate::node::{ControlPrimitive, RenderKind, RenderNode};

pub(crate) fn toggle(c: &Component, ctx: &BuildContext) -> RenderNode {
    let binding = binding_for(c, BindingKind::Bool, ctx);
    let value = binding
        .as_ref()
        .and_then(|b| b.bool_value(ctx.state))
        .or_else(|| c.attr_bool(&["isOn", "is_on", "on", "checked"]))
        .unwrap_or(false);
    RenderNode::new(RenderKind::Control(ControlPrimitive::Toggle {
        binding,
        value,
        on_change: c.events.on_change.clone(),
    }))
}

pub(crate) fn checkbox(c: &Component, ctx: &BuildContext) -> RenderNode {
    let binding = binding_for(c, BindingKind::Bool, ctx);
    let value = binding
        .as_ref()
        .and_then(|b| b.bool_value(ctx.state))
        .or_else(|| c.attr_bool(&["checked", "isOn", "is_on"]))
        .unwrap_or(false);
    RenderNode::new(RenderKind::Control(ControlPrimitive::Checkbox {
        binding,
        value,
        label: label(c, ctx),
        on_change: c.events.on_change.clone(),
    }))
}

pub(crate) fn radio(c: &Component, ctx: &BuildContext) -> RenderNode {
    let binding = binding_for(c, BindingKind::Bool, ctx);
    let value = binding
        .as_ref()
        .and_then(|b| b.bool_value(ctx.state))
        .or_else(|| c.attr_bool(&["checked", "selected"]))
        .unwrap_or(false);
    RenderNode::new(RenderKind::Control(ControlPrimitive::Radio {
        binding,
        value,
        label: label(c, ctx),
        group: c.attr_str(&["group", "radioGroup", "radio_group"]).map(str::to_string),
        on_change: c.events.on_change.clone(),
    }))
}

pub(crate) fn slider(c: &Component, ctx: &BuildContext) -> RenderNode {
    let binding = binding_for(c, BindingKind::Scalar, ctx);
    let min = c.attr_f64(&["minimum", "min", "minValue", "min_value"]).unwrap_or(0.0);
    let max = c
        .attr_f64(&["maximum", "max", "maxValue", "max_value"])
        .unwrap_or(1.0)
        .max(min);
    let value = binding
        .as_ref()
        .and_then(|b| b.number_value(ctx.state))
        .or_else(|| c.attr_f64(&["value", "progress"]))
        .unwrap_or(min)
        .clamp(min, max);
    RenderNode::new(RenderKind::Control(ControlPrimitive::Slider {
        binding,
        value,
        min,
        max,
        on_change: c.events.on_change.clone(),
    }))
}

/// Determinate bar, or a ring when the tag names a circle variant.
pub(crate) fn progress(c: &Component, tag: &str) -> RenderNode {
    let value = c
        .attr_f64(&["progress", "value"])
        .map(|v| v.clamp(0.0, 1.0));
    RenderNode::new(RenderKind::Control(ControlPrimitive::Progress {
        value,
        circular: tag.contains("circle"),
    }))
}

/// Indeterminate spinner.
pub(crate) fn spinner() -> RenderNode {
    RenderNode::new(RenderKind::Control(ControlPrimitive::Progress {
        value: None,
        circular: true,
    }))
}

fn label(c: &Component, ctx: &BuildContext) -> Option<String> {
    c.attr_str(&["text", "label", "title"]).map(|raw| ctx.text(raw))
}
