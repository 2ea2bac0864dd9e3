//! Rectangular edge distances shared by padding and margin decoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::number_of;

/// Per-edge inset distances in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EdgeInsets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets { top: 0.0, right: 0.0, bottom: 0.0, left: 0.0 };

    pub fn all(value: f64) -> EdgeInsets {
        EdgeInsets { top: value, right: value, bottom: value, left: value }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }

    /// Shorthand forms: a bare number applies to every edge; an array of
    /// one to four numbers follows CSS order (`[all]`, `[v, h]`,
    /// `[top, h, bottom]`, `[top, right, bottom, left]`). Anything else
    /// is zero.
    pub fn parse(value: &Value) -> EdgeInsets {
        match value {
            Value::Number(_) | Value::String(_) => {
                number_of(value).map(EdgeInsets::all).unwrap_or_default()
            }
            Value::Array(items) => EdgeInsets::from_array(items),
            _ => EdgeInsets::ZERO,
        }
    }

    fn from_array(items: &[Value]) -> EdgeInsets {
        let nums: Vec<f64> = items.iter().filter_map(number_of).collect();
        match nums.as_slice() {
            [] => EdgeInsets::ZERO,
            [all] => EdgeInsets::all(*all),
            [v, h] => EdgeInsets { top: *v, right: *h, bottom: *v, left: *h },
            [top, h, bottom] => EdgeInsets { top: *top, right: *h, bottom: *bottom, left: *h },
            [top, right, bottom, left, ..] => {
                EdgeInsets { top: *top, right: *right, bottom: *bottom, left: *left }
            }
        }
    }
}
