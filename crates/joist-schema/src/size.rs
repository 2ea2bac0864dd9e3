//! Per-axis size vocabulary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared extent along a single axis.
///
/// `"matchParent"` / `"match_parent"` expand to fill the parent;
/// `"wrapContent"` / `"wrap_content"` (or an absent key) size to content;
/// any JSON number, or a string that parses as one, is a fixed extent in
/// points. Unparseable values degrade to [`SizeSpec::WrapContent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SizeSpec {
    MatchParent,
    #[default]
    WrapContent,
    Fixed(f64),
}

impl SizeSpec {
    pub fn parse(value: &Value) -> SizeSpec {
        match value {
            Value::Number(n) => n.as_f64().map(SizeSpec::Fixed).unwrap_or_default(),
            Value::String(s) => match s.trim() {
                "matchParent" | "match_parent" => SizeSpec::MatchParent,
                "wrapContent" | "wrap_content" => SizeSpec::WrapContent,
                other => other.parse().map(SizeSpec::Fixed).unwrap_or_default(),
            },
            _ => SizeSpec::WrapContent,
        }
    }

    pub fn is_match_parent(self) -> bool {
        matches!(self, SizeSpec::MatchParent)
    }

    pub fn is_wrap_content(self) -> bool {
        matches!(self, SizeSpec::WrapContent)
    }

    /// Fixed extent in points, if declared.
    pub fn fixed(self) -> Option<f64> {
        match self {
            SizeSpec::Fixed(v) => Some(v),
            _ => None,
        }
    }
}
