//! Tab converter. Each child is one page; only the selected page is
//! built into the tree, above a bar carrying every page's title.

use joist_schema::{BindingKind, Component};

use crate::build::{BuildContext, build_child};
use crate::convert::binding_for;
use crate::node::{Axis, ControlPrimitive, RenderKind, RenderNode, StackPrimitive};

pub(crate) fn tab(c: &Component, ctx: &BuildContext) -> RenderNode {
    let titles: Vec<String> = c
        .children
        .iter()
        .enumerate()
        .map(|(i, page)| {
            page.attr_str(&["tabTitle", "tab_title", "title"])
                .map(|raw| ctx.text(raw))
                .unwrap_or_else(|| format!("Tab {}", i + 1))
        })
        .collect();

    let binding = binding_for(c, BindingKind::Index, ctx);
    let selected = binding
        .as_ref()
        .and_then(|b| b.index_value(ctx.state))
        .or_else(|| {
            c.attr_f64(&["selectedIndex", "selected_index"])
                .filter(|v| *v >= 0.0)
                .map(|v| v as usize)
        })
        .unwrap_or(0)
        .min(titles.len().saturating_sub(1));

    let mut children = Vec::new();
    if let Some(page) = c.children.get(selected) {
        let mut page_node = build_child(page, Some(Axis::Vertical), ctx);
        // The page takes everything the bar leaves over.
        page_node.params.weight = 1.0;
        children.push(page_node);
    }
    children.push(RenderNode::new(RenderKind::Control(ControlPrimitive::Tab {
        binding,
        titles,
        selected,
    })));

    RenderNode::new(RenderKind::Stack(StackPrimitive {
        axis: Some(Axis::Vertical),
        spacing: 0.0,
        tap_action: None,
        children,
    }))
}
