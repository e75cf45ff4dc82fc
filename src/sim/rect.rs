//! Axis-aligned rectangle geometry for wall segments
//!
//! A rectangle is stored as its top-left corner plus width and height, in
//! screen coordinates (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (one wall segment)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Extent along x
    pub w: f32,
    /// Extent along y
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// The rectangle grown by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.w + 2.0 * margin,
            self.h + 2.0 * margin,
        )
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Nearest point on (or in) the rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }

    /// The four boundary edges as (start, end) pairs: top, right, bottom, left
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let tl = Vec2::new(self.left(), self.top());
        let tr = Vec2::new(self.right(), self.top());
        let br = Vec2::new(self.right(), self.bottom());
        let bl = Vec2::new(self.left(), self.bottom());
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_bounds() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
    }

    #[test]
    fn test_inflate_grows_every_side() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0).inflate(5.0);
        assert_eq!(r, Rect::new(5.0, 15.0, 40.0, 50.0));
        assert_eq!(r.right(), 45.0);
        assert_eq!(r.bottom(), 65.0);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let overlapping = Rect::new(9.0, 9.0, 10.0, 10.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
        assert!(overlapping.overlaps(&a));
    }

    #[test]
    fn test_closest_point() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.closest_point(Vec2::new(15.0, 5.0)), Vec2::new(10.0, 5.0));
        assert_eq!(r.closest_point(Vec2::new(-3.0, -4.0)), Vec2::ZERO);
        // Inside points map to themselves
        assert_eq!(r.closest_point(Vec2::new(4.0, 6.0)), Vec2::new(4.0, 6.0));
    }

    #[test]
    fn test_edges_form_closed_loop() {
        let r = Rect::new(0.0, 0.0, 4.0, 2.0);
        let edges = r.edges();
        for i in 0..4 {
            assert_eq!(edges[i].1, edges[(i + 1) % 4].0);
        }
    }
}
