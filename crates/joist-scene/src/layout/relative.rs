//! Free-form positioning for containers without a stack axis.
//!
//! Children anchor to parent edges, to the parent center, or to named
//! siblings. Sibling references form a dependency graph; cycles are
//! detected up front and the offending references dropped so a bad
//! document degrades to parent-edge positioning instead of recursing.

use std::collections::HashMap;

use joist_schema::{AnchorSpec, EdgeInsets, Gravity, HAlign, VAlign};
use tracing::warn;

use super::{LayoutDiagnostic, Rect, Size};

/// One child's positioning inputs, measured size included.
#[derive(Debug, Clone)]
pub struct RelChild {
    pub id: Option<String>,
    pub size: Size,
    pub margin: EdgeInsets,
    pub anchors: AnchorSpec,
    pub gravity: Gravity,
    pub gone: bool,
}

/// Resolves every child to a parent-relative rect.
pub fn resolve(children: &[RelChild], bounds: Size) -> (Vec<Rect>, Vec<LayoutDiagnostic>) {
    let mut diagnostics = Vec::new();

    let by_id: HashMap<&str, usize> = children
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.id.as_deref().map(|id| (id, i)))
        .collect();

    let cyclic = find_cycles(children, &by_id, &mut diagnostics);

    let mut rects: Vec<Option<Rect>> = vec![None; children.len()];
    for i in 0..children.len() {
        place(i, children, &by_id, &cyclic, bounds, &mut rects, &mut diagnostics);
    }
    let rects = rects.into_iter().map(|r| r.unwrap_or(Rect::ZERO)).collect();
    (rects, diagnostics)
}

/// Indices a child depends on through sibling anchors. Unknown targets
/// are skipped here; the positioning pass reports them.
fn deps(child: &RelChild, by_id: &HashMap<&str, usize>) -> Vec<usize> {
    [&child.anchors.above, &child.anchors.below, &child.anchors.left_of, &child.anchors.right_of]
        .into_iter()
        .flatten()
        .filter_map(|target| by_id.get(target.as_str()).copied())
        .collect()
}

/// Three-color depth-first search over the sibling dependency graph.
/// Every node on a back-edge loop is marked cyclic.
fn find_cycles(
    children: &[RelChild],
    by_id: &HashMap<&str, usize>,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Vec<bool> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        White,
        Gray,
        Black,
    }

    fn visit(
        i: usize,
        children: &[RelChild],
        by_id: &HashMap<&str, usize>,
        marks: &mut Vec<Mark>,
        trail: &mut Vec<usize>,
        cyclic: &mut Vec<bool>,
    ) {
        marks[i] = Mark::Gray;
        trail.push(i);
        for dep in deps(&children[i], by_id) {
            match marks[dep] {
                Mark::White => visit(dep, children, by_id, marks, trail, cyclic),
                Mark::Gray => {
                    // Everything from the reentry point onward loops.
                    if let Some(start) = trail.iter().position(|&t| t == dep) {
                        for &member in &trail[start..] {
                            cyclic[member] = true;
                        }
                    }
                }
                Mark::Black => {}
            }
        }
        trail.pop();
        marks[i] = Mark::Black;
    }

    let mut marks = vec![Mark::White; children.len()];
    let mut cyclic = vec![false; children.len()];
    for i in 0..children.len() {
        if marks[i] == Mark::White {
            let mut trail = Vec::new();
            visit(i, children, by_id, &mut marks, &mut trail, &mut cyclic);
        }
    }

    if cyclic.iter().any(|&c| c) {
        let ids: Vec<String> = children
            .iter()
            .zip(&cyclic)
            .filter(|&(_, &c)| c)
            .filter_map(|(child, _)| child.id.clone())
            .collect();
        diagnostics.push(LayoutDiagnostic::ConstraintCycle { ids });
    }
    cyclic
}

fn place(
    i: usize,
    children: &[RelChild],
    by_id: &HashMap<&str, usize>,
    cyclic: &[bool],
    bounds: Size,
    rects: &mut Vec<Option<Rect>>,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Rect {
    if let Some(rect) = rects[i] {
        return rect;
    }
    // Break recursion before computing; cyclic members never follow
    // sibling references anyway.
    rects[i] = Some(Rect::ZERO);

    let child = &children[i];
    if child.gone {
        return Rect::ZERO;
    }

    let anchors = &child.anchors;
    let margin = child.margin;
    let size = child.size;

    let mut sibling = |target: &Option<String>| -> Option<Rect> {
        let target = target.as_deref()?;
        if cyclic[i] {
            return None;
        }
        match by_id.get(target) {
            Some(&t) => Some(place(t, children, by_id, cyclic, bounds, rects, diagnostics)),
            None => {
                warn!(target, "anchor references a sibling that does not exist");
                diagnostics
                    .push(LayoutDiagnostic::DanglingAnchor { target: target.to_string() });
                None
            }
        }
    };

    let x = if let Some(t) = sibling(&anchors.right_of) {
        t.right() + margin.left
    } else if let Some(t) = sibling(&anchors.left_of) {
        t.x - size.width - margin.right
    } else if anchors.center_horizontal || anchors.center_in_parent {
        (bounds.width - size.width) / 2.0
    } else if anchors.right {
        bounds.width - size.width - margin.right
    } else if anchors.left {
        margin.left
    } else {
        match child.gravity.horizontal {
            Some(HAlign::Right) => bounds.width - size.width - margin.right,
            Some(HAlign::Center) => (bounds.width - size.width) / 2.0,
            _ => margin.left,
        }
    };

    let y = if let Some(t) = sibling(&anchors.below) {
        t.bottom() + margin.top
    } else if let Some(t) = sibling(&anchors.above) {
        t.y - size.height - margin.bottom
    } else if anchors.center_vertical || anchors.center_in_parent {
        (bounds.height - size.height) / 2.0
    } else if anchors.bottom {
        bounds.height - size.height - margin.bottom
    } else if anchors.top {
        margin.top
    } else {
        match child.gravity.vertical {
            Some(VAlign::Bottom) => bounds.height - size.height - margin.bottom,
            Some(VAlign::Center) => (bounds.height - size.height) / 2.0,
            _ => margin.top,
        }
    };

    let rect = Rect::new(x, y, size.width, size.height);
    rects[i] = Some(rect);
    rect
}
