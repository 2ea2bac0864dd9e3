//! Per-tag component converters.
//!
//! Each function takes the decoded component plus the build context and
//! returns a bare or fully-decorated [`RenderNode`]; `build.rs` owns
//! the dispatch table and the shared post-processing.

pub(crate) mod button;
pub(crate) mod collection;
pub(crate) mod composite;
pub(crate) mod container;
pub(crate) mod controls;
pub(crate) mod field;
pub(crate) mod image;
pub(crate) mod placeholder;
pub(crate) mod select;
pub(crate) mod tab;
pub(crate) mod text;
pub(crate) mod web;

use joist_schema::{Binding, BindingKind, Component, EdgeInsets};

use crate::build::BuildContext;
use crate::color::Rgba;
use crate::modifier::{Fill, FrameSpec, Modifier, background_fill, chain_tail};

pub(crate) const DEFAULT_FONT_SIZE: f64 = 17.0;

/// Declared font size, falling back to the context's base size.
pub(crate) fn font_size(c: &Component, ctx: &BuildContext) -> f64 {
    c.attr_f64(&["fontSize", "font_size"]).unwrap_or(ctx.base_font_size)
}

pub(crate) fn text_color(c: &Component) -> Option<Rgba> {
    c.attr_str(&["fontColor", "font_color", "textColor", "text_color"])
        .and_then(Rgba::parse)
}

/// `lines`/`maxLines`; zero or absent means unlimited.
pub(crate) fn max_lines(c: &Component) -> Option<usize> {
    c.attr_f64(&["lines", "maxLines", "max_lines"])
        .filter(|v| *v >= 1.0)
        .map(|v| v as usize)
}

/// Resolves the two-way binding for a component id, if it has one.
pub(crate) fn binding_for(
    c: &Component,
    kind: BindingKind,
    ctx: &BuildContext,
) -> Option<Binding> {
    c.id.as_deref().and_then(|id| Binding::resolve(id, kind, ctx.state))
}

const FIELD_PADDING: EdgeInsets = EdgeInsets { top: 6.0, right: 8.0, bottom: 6.0, left: 8.0 };
const FIELD_BORDER: Rgba = Rgba { r: 0.8, g: 0.8, b: 0.8, a: 1.0 };
const FIELD_CORNER: f64 = 6.0;

/// Default chrome shared by text fields, text views and select boxes:
/// a white rounded box with a light border, unless the document says
/// otherwise.
pub(crate) fn field_chrome(c: &Component) -> Vec<Modifier> {
    let mut chain = Vec::new();
    let padding = if c.padding.is_zero() { FIELD_PADDING } else { c.padding };
    chain.push(Modifier::Padding(padding));
    let frame = FrameSpec::of(c);
    if !frame.is_default() {
        chain.push(Modifier::Frame(frame));
    }
    let fill = background_fill(c).unwrap_or(Fill::Solid(Rgba::WHITE));
    chain.push(Modifier::Background(fill));
    let radius = if c.corner_radius > 0.0 { c.corner_radius } else { FIELD_CORNER };
    chain.push(Modifier::CornerRadius { radius, clip: true });
    let width = c.border_width.filter(|w| *w > 0.0).unwrap_or(1.0);
    let color = c
        .border_color
        .as_deref()
        .and_then(Rgba::parse)
        .unwrap_or(FIELD_BORDER);
    chain.push(Modifier::Border { width, color });
    chain.extend(chain_tail(c));
    chain
}
