//! Drop shadow declarations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::number_of;

/// Parsed shadow parameters. The color stays a raw string here; the
/// scene layer resolves it to a concrete color at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowSpec {
    pub color: String,
    pub opacity: f64,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ShadowSpec {
    fn default() -> Self {
        ShadowSpec {
            color: "#000000".to_string(),
            opacity: 1.0,
            radius: 4.0,
            x: 0.0,
            y: 2.0,
        }
    }
}

impl ShadowSpec {
    /// Object form keys: `color`, `opacity`, `radius` (alias `blur`),
    /// `x`/`y` (aliases `offsetX`/`offsetY`). Pipe form:
    /// `"color|opacity|radius|x|y"` with trailing segments optional.
    pub fn parse(value: &Value) -> Option<ShadowSpec> {
        match value {
            Value::Object(map) => {
                let mut shadow = ShadowSpec::default();
                if let Some(color) = map.get("color").and_then(Value::as_str) {
                    shadow.color = color.to_string();
                }
                if let Some(v) = map.get("opacity").and_then(number_of) {
                    shadow.opacity = v;
                }
                if let Some(v) = map.get("radius").or_else(|| map.get("blur")).and_then(number_of) {
                    shadow.radius = v;
                }
                if let Some(v) = map.get("x").or_else(|| map.get("offsetX")).and_then(number_of) {
                    shadow.x = v;
                }
                if let Some(v) = map.get("y").or_else(|| map.get("offsetY")).and_then(number_of) {
                    shadow.y = v;
                }
                Some(shadow)
            }
            Value::String(s) if !s.trim().is_empty() => Some(ShadowSpec::from_pipe(s)),
            _ => None,
        }
    }

    fn from_pipe(text: &str) -> ShadowSpec {
        let mut shadow = ShadowSpec::default();
        let mut parts = text.split('|').map(str::trim);
        if let Some(color) = parts.next() {
            if !color.is_empty() {
                shadow.color = color.to_string();
            }
        }
        let mut next_number = || parts.next().and_then(|p| p.parse::<f64>().ok());
        if let Some(v) = next_number() {
            shadow.opacity = v;
        }
        if let Some(v) = next_number() {
            shadow.radius = v;
        }
        if let Some(v) = next_number() {
            shadow.x = v;
        }
        if let Some(v) = next_number() {
            shadow.y = v;
        }
        shadow
    }
}
