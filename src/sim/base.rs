//! The walled player base (obstacle map)
//!
//! Five wall rectangles around a center point: top, left, right, and a bottom
//! wall split in two around the gate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::settings::Settings;

/// Distance beyond the wall used for the gate waypoints
const GATE_CLEARANCE: f32 = 5.0;

/// Fixed wall layout of the base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base {
    pub center: Vec2,
    pub half_width: f32,
    pub half_height: f32,
    pub wall_thickness: f32,
    pub gate_width: f32,
    walls: Vec<Rect>,
}

impl Base {
    pub fn new(
        center: Vec2,
        half_width: f32,
        half_height: f32,
        wall_thickness: f32,
        gate_width: f32,
    ) -> Self {
        let walls = build_walls(center, half_width, half_height, wall_thickness, gate_width);
        Self {
            center,
            half_width,
            half_height,
            wall_thickness,
            gate_width,
            walls,
        }
    }

    /// Base centered in the arena described by `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.base_center(),
            settings.base_half_width,
            settings.base_half_height,
            settings.wall_thickness,
            settings.gate_width,
        )
    }

    /// Wall rectangles in construction order
    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }

    /// Whether a point is strictly within the outer wall boundary
    pub fn is_inside(&self, pos: Vec2) -> bool {
        pos.x > self.center.x - self.half_width
            && pos.x < self.center.x + self.half_width
            && pos.y > self.center.y - self.half_height
            && pos.y < self.center.y + self.half_height
    }

    /// A point just outside the gate (below the bottom wall)
    pub fn gate_position(&self) -> Vec2 {
        Vec2::new(
            self.center.x,
            self.center.y + self.half_height + self.wall_thickness + GATE_CLEARANCE,
        )
    }

    /// A point just inside the gate (above the bottom wall)
    pub fn entry_gate(&self) -> Vec2 {
        Vec2::new(
            self.center.x,
            self.center.y + self.half_height - self.wall_thickness - GATE_CLEARANCE,
        )
    }
}

fn build_walls(
    center: Vec2,
    half_width: f32,
    half_height: f32,
    wall_thickness: f32,
    gate_width: f32,
) -> Vec<Rect> {
    let (cx, cy) = (center.x, center.y);
    let (bw, bh, wt, gw) = (half_width, half_height, wall_thickness, gate_width);
    let segment_width = bw - gw / 2.0;

    vec![
        // Top
        Rect::new(cx - bw, cy - bh, bw * 2.0, wt),
        // Left
        Rect::new(cx - bw, cy - bh, wt, bh * 2.0),
        // Right
        Rect::new(cx + bw - wt, cy - bh, wt, bh * 2.0),
        // Bottom, left of the gate
        Rect::new(cx - bw, cy + bh - wt, segment_width, wt),
        // Bottom, right of the gate
        Rect::new(cx + gw / 2.0, cy + bh - wt, segment_width, wt),
    ]
}
