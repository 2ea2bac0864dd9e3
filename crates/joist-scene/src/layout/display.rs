//! Flattened, z-sorted view of an arranged frame tree.
//!
//! Rendering backends that paint in a single pass consume this instead
//! of walking the tree; the sort is stable, so tree order breaks ties
//! between equal z values.

use super::{Frame, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub id: Option<String>,
    pub rect: Rect,
    pub z: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    pub items: Vec<DisplayItem>,
}

impl DisplayList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Flattens the frame tree in paint order. Fully transparent frames are
/// skipped; their children are too, since opacity accumulates.
pub fn display_list(root: &Frame) -> DisplayList {
    let mut items = Vec::new();
    collect(root, &mut items);
    items.sort_by(|a, b| a.z.partial_cmp(&b.z).unwrap_or(std::cmp::Ordering::Equal));
    DisplayList { items }
}

fn collect(frame: &Frame, items: &mut Vec<DisplayItem>) {
    if frame.opacity <= 0.0 {
        return;
    }
    if frame.rect.width > 0.0 && frame.rect.height > 0.0 {
        items.push(DisplayItem {
            id: frame.id.clone(),
            rect: frame.rect,
            z: frame.z,
            opacity: frame.opacity,
        });
    }
    for child in &frame.children {
        collect(child, items);
    }
}
