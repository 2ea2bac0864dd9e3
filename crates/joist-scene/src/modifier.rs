//! The ordered modifier chain applied to every rendered node.
//!
//! Order is a hard invariant: padding before frame before background
//! before stroke, margin outside all of them. Entries earlier in the
//! vector are innermost. The chain is a closed vocabulary — converters
//! that need an extra effect push one of these variants rather than
//! registering callbacks.

use joist_schema::{Component, EdgeInsets, GradientDirection, SizeSpec, ZOrderHint};

use crate::color::Rgba;

/// Background paint: a solid color or a two-stop-or-more gradient.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Rgba),
    Gradient { colors: Vec<Rgba>, direction: GradientDirection },
}

/// Drop shadow, with the declared opacity already folded into the
/// color's alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowStyle {
    pub color: Rgba,
    pub radius: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Sizing constraints for one node.
///
/// `width`/`height` carry the match-parent/wrap-content/fixed tri-state;
/// the optional bounds refine it. When any min/ideal/max bound is set
/// the frame is "constrained" and the simple tri-state resolution is
/// superseded by the full clamped form.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameSpec {
    pub width: SizeSpec,
    pub height: SizeSpec,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub ideal_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
    pub ideal_height: Option<f64>,
}

impl FrameSpec {
    pub fn of(c: &Component) -> FrameSpec {
        FrameSpec {
            width: c.width,
            height: c.height,
            min_width: c.min_width,
            max_width: c.max_width,
            ideal_width: c.ideal_width,
            min_height: c.min_height,
            max_height: c.max_height,
            ideal_height: c.ideal_height,
        }
    }

    /// Whether any bound beyond the plain width/height tri-state is set.
    pub fn is_constrained(&self) -> bool {
        self.min_width.is_some()
            || self.max_width.is_some()
            || self.ideal_width.is_some()
            || self.min_height.is_some()
            || self.max_height.is_some()
            || self.ideal_height.is_some()
    }

    /// Both axes wrap-content with no bounds: nothing to emit.
    pub fn is_default(&self) -> bool {
        self.width.is_wrap_content() && self.height.is_wrap_content() && !self.is_constrained()
    }
}

/// One visual transformation. A node's `Vec<Modifier>` reads inside-out:
/// index 0 is applied closest to the content.
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    Padding(EdgeInsets),
    Frame(FrameSpec),
    Background(Fill),
    CornerRadius { radius: f64, clip: bool },
    Border { width: f64, color: Rgba },
    Margin(EdgeInsets),
    ZOrder(ZOrderHint),
    Opacity(f64),
    /// Disabled-control dimming overlay.
    Dimmed,
    /// Backdrop blur, pushed by the blur container converter.
    Blur(f64),
    Shadow(ShadowStyle),
    /// width / height, applied when both aspect attributes are declared.
    AspectRatio(f64),
    /// Fill the available space and center the content inside it.
    CenterInParent,
}

/// Builds the standard chain for a component.
///
/// `suppress_padding` is set by relative-positioning parents so child
/// offsets are measured against the full bounds. Converters that manage
/// their own spacing never call this; double application is a bug.
pub fn modifier_chain(c: &Component, suppress_padding: bool) -> Vec<Modifier> {
    let mut chain = Vec::new();

    if !suppress_padding && !c.padding.is_zero() {
        chain.push(Modifier::Padding(c.padding));
    }

    let frame = FrameSpec::of(c);
    if !frame.is_default() {
        chain.push(Modifier::Frame(frame));
    }

    if let Some(fill) = background_fill(c) {
        chain.push(Modifier::Background(fill));
    }

    if c.corner_radius > 0.0 || c.clip_to_bounds {
        chain.push(Modifier::CornerRadius {
            radius: c.corner_radius,
            clip: c.clip_to_bounds || c.corner_radius > 0.0,
        });
    }

    if let Some(width) = c.border_width.filter(|w| *w > 0.0) {
        let color = match c.border_color.as_deref() {
            Some(text) => Rgba::parse_or(text, Rgba::BLACK),
            None => Rgba::BLACK,
        };
        chain.push(Modifier::Border { width, color });
    }

    chain.extend(chain_tail(c));
    chain
}

/// Everything from margin outward. Converters that manage their own
/// inner decoration still share this outer portion, so margins, paint
/// order and visibility behave identically across all node kinds.
pub fn chain_tail(c: &Component) -> Vec<Modifier> {
    let mut chain = Vec::new();

    if !c.margin.is_zero() {
        chain.push(Modifier::Margin(c.margin));
    }

    if let Some(hint) = &c.z_order {
        chain.push(Modifier::ZOrder(hint.clone()));
    }

    let opacity = effective_opacity(c);
    if opacity < 1.0 {
        chain.push(Modifier::Opacity(opacity));
    }

    if !c.enabled {
        chain.push(Modifier::Dimmed);
    }

    if let Some(shadow) = &c.shadow {
        let base = Rgba::parse_or(&shadow.color, Rgba::BLACK);
        chain.push(Modifier::Shadow(ShadowStyle {
            color: base.with_alpha(base.a * shadow.opacity.clamp(0.0, 1.0) as f32),
            radius: shadow.radius,
            offset_x: shadow.x,
            offset_y: shadow.y,
        }));
    }

    if let (Some(w), Some(h)) = (c.aspect_width, c.aspect_height) {
        if h > 0.0 {
            chain.push(Modifier::AspectRatio(w / h));
        }
    }

    if c.anchors.center_in_parent {
        chain.push(Modifier::CenterInParent);
    }

    chain
}

/// Declared opacity (alpha already folded in at decode) multiplied by
/// the visibility term: zero when gone or hidden, one otherwise.
pub fn effective_opacity(c: &Component) -> f64 {
    let declared = c.opacity.unwrap_or(1.0);
    let visible = if c.visibility.is_gone() || c.hidden { 0.0 } else { 1.0 };
    declared * visible
}

/// Gradient wins over a flat background color when both are declared.
pub fn background_fill(c: &Component) -> Option<Fill> {
    if let Some(gradient) = &c.gradient {
        let colors: Vec<Rgba> =
            gradient.colors.iter().filter_map(|t| Rgba::parse(t)).collect();
        if colors.len() >= 2 {
            return Some(Fill::Gradient { colors, direction: gradient.direction });
        }
    }
    let color = Rgba::parse(c.background.as_deref()?)?;
    Some(Fill::Solid(color))
}
