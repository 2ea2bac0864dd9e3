//! Coordinate transform stack for the arrangement pass.
//!
//! Children are placed in parent-relative coordinates; the context
//! accumulates offsets into absolute scene space, a fractional z value
//! for paint order, and the opacity product down the ancestor chain.

use super::Rect;

/// A point in scene space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    offset: Point,
    z: f64,
    opacity: f64,
}

/// Transform state while descending the render tree. `push` must be
/// paired with `pop` when leaving the container.
#[derive(Debug)]
pub struct LayoutContext {
    offset: Point,
    z: f64,
    opacity: f64,
    stack: Vec<Snapshot>,
}

impl LayoutContext {
    pub fn new(origin: Point) -> LayoutContext {
        LayoutContext { offset: origin, z: 0.0, opacity: 1.0, stack: Vec::new() }
    }

    /// Enters a container placed at `local` (parent-relative), with an
    /// optional paint-order bias and the container's own opacity.
    pub fn push(&mut self, local: Point, z_bias: f64, opacity: f64) {
        self.stack.push(Snapshot { offset: self.offset, z: self.z, opacity: self.opacity });
        self.offset.x += local.x;
        self.offset.y += local.y;
        self.z += 1.0 + z_bias;
        self.opacity *= opacity.clamp(0.0, 1.0);
    }

    pub fn pop(&mut self) {
        if let Some(prev) = self.stack.pop() {
            self.offset = prev.offset;
            self.z = prev.z;
            self.opacity = prev.opacity;
        } else {
            debug_assert!(false, "pop() on empty transform stack");
        }
    }

    /// Converts a parent-relative rect to scene space.
    pub fn place(&self, local: Rect) -> Rect {
        Rect {
            x: self.offset.x + local.x,
            y: self.offset.y + local.y,
            width: local.width,
            height: local.height,
        }
    }

    pub fn z(&self, bias: f64) -> f64 {
        self.z + 1.0 + bias
    }

    pub fn opacity(&self, own: f64) -> f64 {
        self.opacity * own.clamp(0.0, 1.0)
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_accumulates_and_pop_restores() {
        let mut ctx = LayoutContext::new(Point::new(10.0, 20.0));
        ctx.push(Point::new(5.0, 10.0), 0.0, 0.5);

        assert_eq!(ctx.offset(), Point::new(15.0, 30.0)); // 10+5, 20+10
        assert_eq!(ctx.opacity(1.0), 0.5);
        assert_eq!(ctx.depth(), 1);

        ctx.pop();
        assert_eq!(ctx.offset(), Point::new(10.0, 20.0));
        assert_eq!(ctx.opacity(1.0), 1.0);
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_nested_depth_raises_z() {
        let mut ctx = LayoutContext::new(Point::ZERO);
        let z0 = ctx.z(0.0);
        ctx.push(Point::ZERO, 0.0, 1.0);
        let z1 = ctx.z(0.0);
        ctx.push(Point::ZERO, 0.0, 1.0);
        let z2 = ctx.z(0.0);
        assert!(z0 < z1 && z1 < z2);
    }

    #[test]
    fn test_bias_shifts_paint_order_fractionally() {
        let ctx = LayoutContext::new(Point::ZERO);
        assert!(ctx.z(0.5) > ctx.z(0.0));
        assert!(ctx.z(-0.5) < ctx.z(0.0));
        // A bias never jumps a whole depth level.
        assert!(ctx.z(0.5) < ctx.z(0.0) + 1.0);
    }

    #[test]
    fn test_place_is_offset_translation() {
        let mut ctx = LayoutContext::new(Point::new(100.0, 200.0));
        ctx.push(Point::new(10.0, 20.0), 0.0, 1.0);
        let placed = ctx.place(Rect::new(1.0, 2.0, 30.0, 40.0));
        assert_eq!(placed, Rect::new(111.0, 222.0, 30.0, 40.0));
    }
}
