// src/geom.rs

//! Coordinate newtypes shared by the viewer core.
//!
//! The pixel-map viewer juggles three coordinate systems: world space (the
//! continuous plane tiles are placed in), screen space (window pixels after
//! zoom/pan), and the tile grid. World and screen values are kept as distinct
//! types so they can only be converted through `ViewTransform`, never mixed
//! by accident.

/// A point in screen space (window pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A point in world space (tile-plane units, one unit per byte pixel).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// True when the two rectangles overlap. Zero-area rectangles never
    /// intersect anything.
    pub fn intersects(&self, other: &ScreenRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// An axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl WorldRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_rect_contains_is_half_open() {
        let r = ScreenRect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(ScreenPoint::new(10.0, 10.0)));
        assert!(r.contains(ScreenPoint::new(29.9, 29.9)));
        assert!(!r.contains(ScreenPoint::new(30.0, 10.0)));
        assert!(!r.contains(ScreenPoint::new(9.9, 15.0)));
    }

    #[test]
    fn screen_rect_intersection() {
        let a = ScreenRect::new(0.0, 0.0, 10.0, 10.0);
        let b = ScreenRect::new(5.0, 5.0, 10.0, 10.0);
        let c = ScreenRect::new(20.0, 20.0, 5.0, 5.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn zero_area_rect_never_intersects() {
        let a = ScreenRect::new(0.0, 0.0, 10.0, 10.0);
        let empty = ScreenRect::new(5.0, 5.0, 0.0, 0.0);
        assert!(!a.intersects(&empty));
    }
}
