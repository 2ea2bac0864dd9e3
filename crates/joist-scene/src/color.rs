//! Color parsing for document attributes.
//!
//! Accepts the full CSS color syntax plus the bare-hex shorthand
//! (`"FF0000"`) that layout documents commonly use.

use std::str::FromStr;

use csscolorparser::Color as CssColor;

/// Straight (non-premultiplied) RGBA, channels in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
    pub const BLACK: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Rgba = Rgba { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const RED: Rgba = Rgba { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Rgba {
        Rgba { r, g, b, a }
    }

    pub fn opaque(r: f32, g: f32, b: f32) -> Rgba {
        Rgba { r, g, b, a: 1.0 }
    }

    /// Same color with the alpha channel replaced.
    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba { a: a.clamp(0.0, 1.0), ..self }
    }

    /// Parses a CSS color string. Bare hex digits get a `#` retry, so
    /// both `"#FF0000"` and `"FF0000"` work.
    pub fn parse(text: &str) -> Option<Rgba> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(c) = CssColor::from_str(text) {
            return Some(Rgba { r: c.r, g: c.g, b: c.b, a: c.a });
        }
        if looks_like_bare_hex(text) {
            if let Ok(c) = CssColor::from_str(&format!("#{text}")) {
                return Some(Rgba { r: c.r, g: c.g, b: c.b, a: c.a });
            }
        }
        None
    }

    pub fn parse_or(text: &str, fallback: Rgba) -> Rgba {
        Rgba::parse(text).unwrap_or(fallback)
    }
}

fn looks_like_bare_hex(text: &str) -> bool {
    matches!(text.len(), 3 | 4 | 6 | 8) && text.bytes().all(|b| b.is_ascii_hexdigit())
}
