//! Whole-document failures.
//!
//! Everything below the document root degrades silently; these variants
//! are the only loud outcomes the schema layer produces.

use thiserror::Error;

/// A layout document that cannot produce any component tree at all.
#[derive(Debug, Clone, Error)]
pub enum DocumentError {
    /// The raw text was not valid JSON.
    #[error("layout is not valid JSON: {message}")]
    Parse { message: String, preview: String },
    /// The document parsed but its root node cannot render.
    #[error("layout root cannot render: {message}")]
    Root { message: String, preview: String },
    /// No source produced text for the requested layout name.
    #[error("layout {name:?} was not found")]
    Missing { name: String },
}

impl DocumentError {
    /// Human-readable reason without the raw excerpt.
    pub fn message(&self) -> String {
        match self {
            DocumentError::Parse { message, .. } | DocumentError::Root { message, .. } => {
                message.clone()
            }
            DocumentError::Missing { name } => format!("layout {name:?} was not found"),
        }
    }

    /// Excerpt of the offending document, bounded for display.
    pub fn preview(&self) -> &str {
        match self {
            DocumentError::Parse { preview, .. } | DocumentError::Root { preview, .. } => preview,
            DocumentError::Missing { .. } => "",
        }
    }
}

/// Truncates raw document text to a displayable excerpt.
pub(crate) fn preview_of(text: &str) -> String {
    const LIMIT: usize = 160;
    let trimmed = text.trim();
    if trimmed.len() <= LIMIT {
        return trimmed.to_string();
    }
    let mut cut = LIMIT;
    while cut > 0 && !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…", &trimmed[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_is_bounded() {
        let long = "x".repeat(500);
        let preview = preview_of(&long);
        assert!(preview.chars().count() <= 161);
        assert!(preview.ends_with('…'));
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let long = "é".repeat(200);
        // Must not panic on a multi-byte boundary.
        let _ = preview_of(&long);
    }

    #[test]
    fn missing_has_empty_preview() {
        let err = DocumentError::Missing { name: "home".to_string() };
        assert_eq!(err.preview(), "");
        assert!(err.message().contains("home"));
    }
}
