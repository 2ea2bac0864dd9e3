//! Android-style gravity keywords mapped to two-axis alignment.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Alignment request along each axis; `None` means not declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Gravity {
    pub horizontal: Option<HAlign>,
    pub vertical: Option<VAlign>,
}

impl Gravity {
    /// Accepted forms: a single keyword, a `|`-separated keyword string,
    /// or an array of keyword strings. Later tokens win per axis and
    /// unrecognized tokens are ignored.
    pub fn parse(value: &Value) -> Gravity {
        let mut gravity = Gravity::default();
        match value {
            Value::String(s) => gravity.apply_tokens(s),
            Value::Array(items) => {
                for item in items {
                    if let Value::String(s) = item {
                        gravity.apply_tokens(s);
                    }
                }
            }
            _ => {}
        }
        gravity
    }

    fn apply_tokens(&mut self, tokens: &str) {
        for token in tokens.split('|') {
            match token.trim() {
                "left" | "start" => self.horizontal = Some(HAlign::Left),
                "right" | "end" => self.horizontal = Some(HAlign::Right),
                "centerHorizontal" | "center_horizontal" => {
                    self.horizontal = Some(HAlign::Center)
                }
                "top" => self.vertical = Some(VAlign::Top),
                "bottom" => self.vertical = Some(VAlign::Bottom),
                "centerVertical" | "center_vertical" => self.vertical = Some(VAlign::Center),
                "center" => {
                    self.horizontal = Some(HAlign::Center);
                    self.vertical = Some(VAlign::Center);
                }
                _ => {}
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }

    /// Effective alignment with the top-left default filled in.
    pub fn resolved(&self) -> (HAlign, VAlign) {
        (
            self.horizontal.unwrap_or(HAlign::Left),
            self.vertical.unwrap_or(VAlign::Top),
        )
    }
}
