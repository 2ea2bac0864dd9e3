//! Natural-size measurement.
//!
//! Text uses a metrics heuristic (average advance per character, fixed
//! ascent/descent ratios) so layout stays deterministic without a font
//! stack. Controls carry platform-typical intrinsic extents.

use joist_schema::SizeSpec;

use super::Size;
use crate::node::{Axis, ControlPrimitive, RenderKind, RenderNode, ScrollPrimitive, StackPrimitive};

/// Average glyph advance as a fraction of the font size.
const AVG_ADVANCE: f64 = 0.55;
const ASCENT: f64 = 0.8;
const DESCENT: f64 = 0.2;
const LINE_HEIGHT: f64 = 1.2;

const TOGGLE_SIZE: Size = Size { width: 51.0, height: 31.0 };
const CHECK_BOX: f64 = 24.0;
const CHECK_GAP: f64 = 8.0;
const SLIDER_SIZE: Size = Size { width: 150.0, height: 28.0 };
const PROGRESS_BAR: Size = Size { width: 150.0, height: 4.0 };
const SPINNER: Size = Size { width: 37.0, height: 37.0 };
const FIELD_SIZE: Size = Size { width: 150.0, height: 34.0 };
const TEXT_VIEW_SIZE: Size = Size { width: 200.0, height: 80.0 };
const TAB_BAR_HEIGHT: f64 = 49.0;
const TAB_ITEM_PAD: f64 = 24.0;
const WEB_SIZE: Size = Size { width: 300.0, height: 150.0 };

/// Text extent oracle. The layout engine only ever needs rectangles,
/// so a backend with real font metrics can slot in here.
pub trait TextMeasurer {
    fn measure(
        &self,
        text: &str,
        font_size: f64,
        wrap_width: Option<f64>,
        max_lines: Option<usize>,
    ) -> Size;
}

/// Font-free estimate: greedy word wrap over a per-line character
/// budget derived from the average advance.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicMeasurer;

impl TextMeasurer for HeuristicMeasurer {
    fn measure(
        &self,
        text: &str,
        font_size: f64,
        wrap_width: Option<f64>,
        max_lines: Option<usize>,
    ) -> Size {
        let font_size = font_size.max(1.0);
        let advance = font_size * AVG_ADVANCE;
        let budget = wrap_width
            .filter(|w| w.is_finite())
            .map(|w| ((w / advance).floor() as usize).max(1));

        let mut lines: Vec<usize> = Vec::new();
        for para in text.split('\n') {
            match budget {
                None => lines.push(para.chars().count()),
                Some(budget) => wrap_paragraph(para, budget, &mut lines),
            }
        }
        if lines.is_empty() {
            lines.push(0);
        }
        if let Some(max) = max_lines {
            lines.truncate(max.max(1));
        }

        let longest = lines.iter().copied().max().unwrap_or(0);
        let height = font_size * (ASCENT + DESCENT)
            + (lines.len().saturating_sub(1)) as f64 * font_size * LINE_HEIGHT;
        Size { width: longest as f64 * advance, height }
    }
}

fn wrap_paragraph(para: &str, budget: usize, lines: &mut Vec<usize>) {
    let mut current = 0usize;
    let mut started = false;
    for word in para.split_whitespace() {
        let len = word.chars().count();
        if !started {
            current = len;
            started = true;
        } else if current + 1 + len <= budget {
            current += 1 + len;
        } else {
            lines.push(current);
            current = len;
        }
    }
    lines.push(current);
}

/// Infinity-aware availability shrink.
pub(crate) fn shrink(extent: f64, by: f64) -> f64 {
    if extent.is_finite() { (extent - by).max(0.0) } else { extent }
}

/// Border-box natural size of a node given the available box. Margins
/// are the parent's business and are not included.
pub fn measure(node: &RenderNode, avail: Size, m: &dyn TextMeasurer) -> Size {
    let padding = node.padding();
    let inner = Size {
        width: shrink(avail.width, padding.horizontal()),
        height: shrink(avail.height, padding.vertical()),
    };

    let content = match &node.kind {
        RenderKind::Text(t) => {
            let wrap = inner.width.is_finite().then_some(inner.width);
            m.measure(&t.text, t.font_size, wrap, t.max_lines)
        }
        // No decoded bitmap: images size from their frame alone.
        RenderKind::Image(_) => Size::ZERO,
        RenderKind::Shape => Size::ZERO,
        RenderKind::Stack(stack) => measure_stack(stack, inner, m),
        RenderKind::Scroll(scroll) => measure_scroll(scroll, inner, m),
        RenderKind::Control(control) => measure_control(control, inner, m),
    };

    let natural = Size {
        width: content.width + padding.horizontal(),
        height: content.height + padding.vertical(),
    };
    let frame = node.frame();
    let mut size = Size {
        width: resolve_axis(
            frame.width,
            avail.width,
            natural.width,
            frame.min_width,
            frame.max_width,
            frame.ideal_width,
        ),
        height: resolve_axis(
            frame.height,
            avail.height,
            natural.height,
            frame.min_height,
            frame.max_height,
            frame.ideal_height,
        ),
    };

    if let Some(ratio) = node.aspect_ratio() {
        if ratio > 0.0 {
            if frame.height.is_wrap_content() && !frame.width.is_wrap_content() {
                size.height = size.width / ratio;
            } else if frame.width.is_wrap_content() {
                size.width = size.height * ratio;
            }
        }
    }
    size
}

fn measure_stack(stack: &StackPrimitive, inner: Size, m: &dyn TextMeasurer) -> Size {
    let mut main = 0.0f64;
    let mut cross = 0.0f64;
    let mut visible = 0usize;
    for child in &stack.children {
        if child.params.visibility.is_gone() {
            continue;
        }
        let margin = child.margin();
        let child_avail = Size {
            width: shrink(inner.width, margin.horizontal()),
            height: shrink(inner.height, margin.vertical()),
        };
        let size = measure(child, child_avail, m);
        let outer = Size {
            width: size.width + margin.horizontal(),
            height: size.height + margin.vertical(),
        };
        visible += 1;
        match stack.axis {
            Some(Axis::Horizontal) => {
                main += outer.width;
                cross = cross.max(outer.height);
            }
            Some(Axis::Vertical) => {
                main += outer.height;
                cross = cross.max(outer.width);
            }
            // Anchored children overlap; the container wraps the largest.
            None => {
                main = main.max(outer.height);
                cross = cross.max(outer.width);
            }
        }
    }
    let spacing = stack.spacing * visible.saturating_sub(1) as f64;
    match stack.axis {
        Some(Axis::Horizontal) => Size { width: main + spacing, height: cross },
        Some(Axis::Vertical) => Size { width: cross, height: main + spacing },
        None => Size { width: cross, height: main },
    }
}

fn measure_scroll(scroll: &ScrollPrimitive, inner: Size, m: &dyn TextMeasurer) -> Size {
    let content_avail = Size {
        width: if scroll.horizontal { f64::INFINITY } else { inner.width },
        height: if scroll.vertical { f64::INFINITY } else { inner.height },
    };
    let axis = if scroll.horizontal && !scroll.vertical {
        Some(Axis::Horizontal)
    } else {
        Some(Axis::Vertical)
    };
    let stack = StackPrimitive {
        axis,
        spacing: scroll.spacing,
        tap_action: None,
        children: scroll.children.clone(),
    };
    measure_stack(&stack, content_avail, m)
}

fn measure_control(control: &ControlPrimitive, inner: Size, m: &dyn TextMeasurer) -> Size {
    match control {
        ControlPrimitive::Button { label, icon, font_size, .. } => {
            let text = m.measure(label, font_size.unwrap_or(17.0), None, Some(1));
            let icon_width = if icon.is_some() { text.height + CHECK_GAP } else { 0.0 };
            Size { width: text.width + icon_width, height: text.height }
        }
        ControlPrimitive::Toggle { .. } => TOGGLE_SIZE,
        ControlPrimitive::Checkbox { label, .. } | ControlPrimitive::Radio { label, .. } => {
            match label {
                Some(label) => {
                    let text = m.measure(label, 17.0, None, Some(1));
                    Size {
                        width: CHECK_BOX + CHECK_GAP + text.width,
                        height: CHECK_BOX.max(text.height),
                    }
                }
                None => Size { width: CHECK_BOX, height: CHECK_BOX },
            }
        }
        ControlPrimitive::Slider { .. } => SLIDER_SIZE,
        ControlPrimitive::Progress { circular, .. } => {
            if *circular { SPINNER } else { PROGRESS_BAR }
        }
        ControlPrimitive::TextField { .. } | ControlPrimitive::Select { .. } => FIELD_SIZE,
        ControlPrimitive::TextView { .. } => TEXT_VIEW_SIZE,
        ControlPrimitive::Tab { titles, .. } => {
            let width: f64 = titles
                .iter()
                .map(|t| m.measure(t, 12.0, None, Some(1)).width + TAB_ITEM_PAD)
                .sum();
            let width = if inner.width.is_finite() { inner.width.max(width) } else { width };
            Size { width, height: TAB_BAR_HEIGHT }
        }
        ControlPrimitive::Web { .. } => WEB_SIZE,
    }
}

/// Resolves one axis of the size tri-state against availability.
///
/// `ideal` stands in for content under wrap-content; min/max clamp every
/// outcome. Match-parent against unbounded space falls back to content.
fn resolve_axis(
    spec: SizeSpec,
    avail: f64,
    content: f64,
    min: Option<f64>,
    max: Option<f64>,
    ideal: Option<f64>,
) -> f64 {
    let mut v = match spec {
        SizeSpec::Fixed(x) => x,
        SizeSpec::MatchParent => {
            if avail.is_finite() {
                avail.max(0.0)
            } else {
                content
            }
        }
        SizeSpec::WrapContent => ideal.unwrap_or(content),
    };
    if let Some(min) = min {
        v = v.max(min);
    }
    if let Some(max) = max {
        v = v.min(max);
    }
    v.max(0.0)
}
