//! Tri-state visibility.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `Visible` draws and occupies space; `Invisible` occupies its normal
/// space but draws fully transparent; `Gone` neither draws nor occupies
/// space. The three states are distinct on purpose and must not be
/// collapsed into each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Visible,
    Invisible,
    Gone,
}

impl Visibility {
    pub fn parse(value: &Value) -> Visibility {
        match value.as_str().map(str::trim) {
            Some("invisible") => Visibility::Invisible,
            Some("gone") => Visibility::Gone,
            _ => Visibility::Visible,
        }
    }

    pub fn is_gone(self) -> bool {
        matches!(self, Visibility::Gone)
    }

    /// Whether the node reserves layout space.
    pub fn occupies_space(self) -> bool {
        !self.is_gone()
    }
}
