//! Layout engine: turns a render tree plus a viewport into absolute
//! frames.
//!
//! The pass is synchronous and whole-tree; any input change (viewport
//! resize, state-driven rebuild) re-runs it from the root rather than
//! patching incrementally. Containers stack along an axis with weighted
//! distribution, or position children by anchors when no axis is
//! declared.

pub mod arrange;
pub mod context;
pub mod display;
pub mod measure;
pub mod relative;
pub mod weighted;

pub use context::{LayoutContext, Point};
pub use display::{DisplayItem, DisplayList, display_list};
pub use measure::{HeuristicMeasurer, TextMeasurer};

use crate::node::RenderNode;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    pub fn new(width: f64, height: f64) -> Size {
        Size { width, height }
    }
}

/// Axis-aligned rectangle in absolute scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size { width: self.width, height: self.height }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// One placed node. The frame tree mirrors the render tree exactly,
/// including zero-footprint entries for gone nodes, so the two can be
/// walked in parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub id: Option<String>,
    pub rect: Rect,
    pub z: f64,
    /// Accumulated opacity, parent chain included.
    pub opacity: f64,
    pub children: Vec<Frame>,
}

impl Frame {
    pub fn find(&self, id: &str) -> Option<&Frame> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Topmost frame whose rect contains the point, by z.
    pub fn hit(&self, x: f64, y: f64) -> Option<&Frame> {
        let mut best: Option<&Frame> = None;
        self.hit_into(x, y, &mut best);
        best
    }

    fn hit_into<'a>(&'a self, x: f64, y: f64, best: &mut Option<&'a Frame>) {
        if self.opacity > 0.0 && self.rect.contains(x, y) {
            match best {
                Some(b) if b.z >= self.z => {}
                _ => *best = Some(self),
            }
        }
        for child in &self.children {
            child.hit_into(x, y, best);
        }
    }
}

/// Non-fatal problems found while arranging. These never abort a pass;
/// the offending constraint is dropped and layout continues.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutDiagnostic {
    /// Sibling anchors form a dependency loop; the listed nodes fall
    /// back to parent-edge positioning.
    ConstraintCycle { ids: Vec<String> },
    /// An anchor names a sibling id that does not exist.
    DanglingAnchor { target: String },
    /// A z-order hint names a sibling id that does not exist.
    UnknownZOrderTarget { target: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub root: Frame,
    pub diagnostics: Vec<LayoutDiagnostic>,
}

/// Lays out a render tree against a viewport.
pub fn layout(root: &RenderNode, viewport: Size, measurer: &dyn TextMeasurer) -> LayoutResult {
    arrange::run(root, viewport, measurer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        assert!(r.contains(10.0, 20.0));
        assert!(!r.contains(40.0, 20.0));
    }

    #[test]
    fn test_frame_find_and_hit() {
        let child = Frame {
            id: Some("inner".to_string()),
            rect: Rect::new(10.0, 10.0, 20.0, 20.0),
            z: 1.0,
            opacity: 1.0,
            children: Vec::new(),
        };
        let root = Frame {
            id: Some("outer".to_string()),
            rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            z: 0.0,
            opacity: 1.0,
            children: vec![child],
        };
        assert!(root.find("inner").is_some());
        assert_eq!(root.hit(15.0, 15.0).and_then(|f| f.id.as_deref()), Some("inner"));
        assert_eq!(root.hit(50.0, 50.0).and_then(|f| f.id.as_deref()), Some("outer"));
    }

    #[test]
    fn test_fully_transparent_frames_do_not_hit() {
        let root = Frame {
            id: Some("ghost".to_string()),
            rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            z: 0.0,
            opacity: 0.0,
            children: Vec::new(),
        };
        assert!(root.hit(50.0, 50.0).is_none());
    }
}
