//! Collection and table converters. Data comes from the state store
//! via the sectioned payload convention; the converter expands it into
//! a plain vertical stack of header, cell and footer rows.

use joist_schema::{Component, EdgeInsets, Section, StateValue, sections_for};
use tracing::debug;

use crate::build::BuildContext;
use crate::color::Rgba;
use crate::convert::font_size;
use crate::modifier::Modifier;
use crate::node::{Axis, RenderKind, RenderNode, StackPrimitive, TextPrimitive};

const CELL_PADDING: f64 = 8.0;
const HEADER_TINT: Rgba = Rgba { r: 0.4, g: 0.4, b: 0.4, a: 1.0 };

pub(crate) fn collection(c: &Component, ctx: &BuildContext) -> RenderNode {
    let columns = c
        .attr_f64(&["columns", "columnCount", "column_count"])
        .filter(|v| *v >= 1.0)
        .map(|v| v as usize)
        .unwrap_or(1);
    rows_stack(c, ctx, columns)
}

/// Tables are single-column collections with the same data plumbing.
pub(crate) fn table(c: &Component, ctx: &BuildContext) -> RenderNode {
    rows_stack(c, ctx, 1)
}

fn rows_stack(c: &Component, ctx: &BuildContext, columns: usize) -> RenderNode {
    let sections = match c.id.as_deref() {
        Some(id) => sections_for(id, ctx.state),
        None => Vec::new(),
    };
    if sections.is_empty() {
        debug!(id = ?c.id, "collection has no payload in the store");
    }
    let show_header = c.attr_bool(&["showHeader", "show_header"]).unwrap_or(true);
    let show_footer = c.attr_bool(&["showFooter", "show_footer"]).unwrap_or(true);
    let size = font_size(c, ctx);

    let mut rows: Vec<RenderNode> = Vec::new();
    for section in &sections {
        push_section(&mut rows, section, columns, size, c.spacing, show_header, show_footer);
    }

    RenderNode::new(RenderKind::Stack(StackPrimitive {
        axis: Some(Axis::Vertical),
        spacing: c.spacing,
        tap_action: None,
        children: rows,
    }))
}

fn push_section(
    rows: &mut Vec<RenderNode>,
    section: &Section,
    columns: usize,
    size: f64,
    spacing: f64,
    show_header: bool,
    show_footer: bool,
) {
    if show_header {
        if let Some(header) = &section.header {
            rows.push(caption(header, size));
        }
    }
    if columns <= 1 {
        rows.extend(section.cells.iter().map(|cell| cell_node(cell, size)));
    } else {
        for chunk in section.cells.chunks(columns) {
            let children = chunk.iter().map(|cell| {
                let mut node = cell_node(cell, size);
                node.params.weight = 1.0;
                node
            });
            rows.push(RenderNode::new(RenderKind::Stack(StackPrimitive {
                axis: Some(Axis::Horizontal),
                spacing,
                tap_action: None,
                children: children.collect(),
            })));
        }
    }
    if show_footer {
        if let Some(footer) = &section.footer {
            rows.push(caption(footer, size));
        }
    }
}

fn cell_node(payload: &StateValue, size: f64) -> RenderNode {
    let mut node = RenderNode::new(RenderKind::Text(TextPrimitive::new(
        payload_text(payload),
        size,
    )));
    node.modifiers.push(Modifier::Padding(EdgeInsets::all(CELL_PADDING)));
    node
}

/// Slightly smaller grey text for headers and footers.
fn caption(payload: &StateValue, size: f64) -> RenderNode {
    let mut primitive = TextPrimitive::new(payload_text(payload), (size - 3.0).max(10.0));
    primitive.color = HEADER_TINT;
    let mut node = RenderNode::new(RenderKind::Text(primitive));
    node.modifiers.push(Modifier::Padding(EdgeInsets::all(CELL_PADDING)));
    node
}

/// Cell payloads are either plain values or maps carrying a title-like
/// field.
fn payload_text(payload: &StateValue) -> String {
    if let StateValue::Map(map) = payload {
        for key in ["title", "text", "name", "label"] {
            if let Some(value) = map.get(key) {
                return value.display();
            }
        }
    }
    payload.display()
}
