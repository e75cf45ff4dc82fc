//! Collision detection and response for circles, segments and wall rectangles
//!
//! Units are circles; walls are axis-aligned rectangles. Everything here is a
//! pure function of its inputs except the coincident-centre nudge, which draws
//! from the caller's seeded RNG.

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;

/// Push direction used when a circle centre sits exactly on a wall point
pub const FALLBACK_PUSH_DIR: Vec2 = Vec2::new(0.0, -1.0);

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Separation direction (pointing from the obstacle toward the circle)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Strict circle-circle overlap
#[inline]
pub fn circles_collide(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Separate two overlapping circles by moving each half the overlap apart
///
/// Returns true if the pair overlapped. Coincident centres get a small random
/// nudge first so the separation axis is defined.
pub fn resolve_circle_pair<R: Rng>(
    a: &mut Vec2,
    ra: f32,
    b: &mut Vec2,
    rb: f32,
    rng: &mut R,
) -> bool {
    if !circles_collide(*a, ra, *b, rb) {
        return false;
    }

    let mut d = a.distance(*b);
    if d == 0.0 {
        a.x += rng.random_range(-1.0f32..=1.0);
        a.y += rng.random_range(-1.0f32..=1.0);
        d = a.distance(*b);
    }

    let axis = if d > 0.0 {
        (*a - *b) / d
    } else {
        // The nudge landed back on the same point
        FALLBACK_PUSH_DIR
    };
    let overlap = ra + rb - d;
    let displacement = axis * (overlap / 2.0);
    *a += displacement;
    *b -= displacement;
    true
}

/// Check a circle against a wall rectangle
///
/// The normal points from the nearest rectangle point toward the circle
/// centre. A centre lying exactly on that point (fully inside the wall) uses
/// [`FALLBACK_PUSH_DIR`] and reports the full radius as penetration.
pub fn circle_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> CollisionResult {
    let closest = rect.closest_point(center);
    let offset = center - closest;
    let dist = offset.length();

    if dist >= radius {
        return CollisionResult::miss();
    }

    if dist == 0.0 {
        return CollisionResult {
            hit: true,
            normal: FALLBACK_PUSH_DIR,
            penetration: radius,
        };
    }

    CollisionResult {
        hit: true,
        normal: offset / dist,
        penetration: radius - dist,
    }
}

#[inline]
fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Whether `q` lies within the bounding box of segment `p`-`r` (collinear case)
#[inline]
fn on_segment(p: Vec2, q: Vec2, r: Vec2) -> bool {
    q.x >= p.x.min(r.x) && q.x <= p.x.max(r.x) && q.y >= p.y.min(r.y) && q.y <= p.y.max(r.y)
}

/// Segment-segment intersection, touching endpoints and collinear overlap included
pub fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = cross(q2 - q1, p1 - q1);
    let d2 = cross(q2 - q1, p2 - q1);
    let d3 = cross(p2 - p1, q1 - p1);
    let d4 = cross(p2 - p1, q2 - p1);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, p1, q2))
        || (d2 == 0.0 && on_segment(q1, p2, q2))
        || (d3 == 0.0 && on_segment(p1, q1, p2))
        || (d4 == 0.0 && on_segment(p1, q2, p2))
}

/// Whether a segment crosses any of the rectangle's four edges
pub fn segment_crosses_rect(a: Vec2, b: Vec2, rect: &Rect) -> bool {
    rect.edges()
        .iter()
        .any(|&(e1, e2)| segments_intersect(a, b, e1, e2))
}

/// Line-of-sight test against a set of walls
pub fn line_of_sight_blocked(a: Vec2, b: Vec2, walls: &[Rect]) -> bool {
    walls.iter().any(|wall| segment_crosses_rect(a, b, wall))
}
