//! Select box converter: a list picker by default, a date or time
//! picker when the item type says so.

use joist_schema::{BindingKind, Component};
use serde_json::Value;

use crate::build::BuildContext;
use crate::convert::{binding_for, field_chrome};
use crate::node::{ControlPrimitive, RenderKind, RenderNode, SelectMode};

pub(crate) fn select_box(c: &Component, ctx: &BuildContext) -> RenderNode {
    let items = items(c, ctx);
    let binding = binding_for(c, BindingKind::Index, ctx);
    let declared = c
        .attr_f64(&["selectedIndex", "selected_index"])
        .filter(|v| *v >= 0.0)
        .map(|v| v as usize);
    let selected = binding
        .as_ref()
        .and_then(|b| b.index_value(ctx.state))
        .or(declared)
        .unwrap_or(0)
        .min(items.len().saturating_sub(1));

    let primitive = ControlPrimitive::Select {
        binding,
        items,
        selected,
        mode: mode(c),
        on_change: c.events.on_change.clone(),
    };

    let mut node = RenderNode::new(RenderKind::Control(primitive));
    node.modifiers = field_chrome(c);
    node
}

fn items(c: &Component, ctx: &BuildContext) -> Vec<String> {
    let Some(Value::Array(raw)) = c.attr_any(&["items", "options"]) else {
        return Vec::new();
    };
    raw.iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(ctx.text(s)),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

fn mode(c: &Component) -> SelectMode {
    let declared = c
        .attr_str(&["selectItemType", "select_item_type", "mode"])
        .map(str::to_ascii_lowercase);
    match declared.as_deref() {
        Some(m) if m.contains("date") => SelectMode::Date,
        Some(m) if m.contains("time") => SelectMode::Time,
        _ => SelectMode::List,
    }
}
