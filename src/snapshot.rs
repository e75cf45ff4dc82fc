//! Read-only view of the game handed to the render shell

use serde::Serialize;

use crate::sim::{GameState, LaserEffect, Rect, Unit};
use crate::ui::hud_lines;

/// Everything needed to draw one frame, borrowed from the state
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub time_ticks: u64,
    pub wave: u32,
    pub active_group: Option<usize>,
    pub respawn_timer: Option<u32>,
    pub groups: &'a [Vec<Unit>],
    pub enemies: &'a [Unit],
    pub lasers: &'a [LaserEffect],
    pub walls: &'a [Rect],
    pub hud: Vec<String>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            time_ticks: self.time_ticks,
            wave: self.enemy_wave,
            active_group: self.active_group,
            respawn_timer: self.respawn_timer,
            groups: &self.player_groups,
            enemies: &self.enemies,
            lasers: &self.lasers,
            walls: self.base.walls(),
            hud: hud_lines(self),
        }
    }
}

impl Snapshot<'_> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
