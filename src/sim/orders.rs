//! Player commands: move orders, group selection and the dev kill switch

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::consts::{FORMATION_RADIUS_PER_UNIT, MIN_FORMATION_RADIUS};
use crate::polar_to_cartesian;

/// Commands gathered by the shell between two ticks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Right-click destination
    pub move_target: Option<Vec2>,
    /// Group selection key (0-based group index)
    pub toggle_group: Option<usize>,
    /// Dev shortcut: kill one player unit
    pub kill_unit: bool,
}

/// Destinations for `count` units ordered to `target`
///
/// A lone unit goes to the target itself; a larger group spreads evenly on a
/// circle around it.
pub fn formation_slots(target: Vec2, count: usize) -> Vec<Vec2> {
    match count {
        0 => Vec::new(),
        1 => vec![target],
        n => {
            let radius = (n as f32 * FORMATION_RADIUS_PER_UNIT).max(MIN_FORMATION_RADIUS);
            (0..n)
                .map(|i| target + polar_to_cartesian(radius, i as f32 * TAU / n as f32))
                .collect()
        }
    }
}

impl GameState {
    /// Route the active group (or every group) toward `target`
    pub fn issue_move_order(&mut self, target: Vec2) {
        match self.active_group {
            Some(index) if index < self.player_groups.len() => {
                self.order_group(index, target);
            }
            _ => {
                for index in 0..self.player_groups.len() {
                    self.order_group(index, target);
                }
            }
        }
    }

    fn order_group(&mut self, index: usize, target: Vec2) {
        let pathfinder = &self.pathfinder;
        let Some(group) = self.player_groups.get_mut(index) else {
            return;
        };

        let slots = formation_slots(target, group.len());
        for (unit, slot) in group.iter_mut().zip(slots) {
            let path = pathfinder.compute_path(unit.pos, slot);
            unit.set_path(&path);
        }
        log::debug!(
            "Group {} ordered to ({:.0}, {:.0})",
            index + 1,
            target.x,
            target.y
        );
    }

    /// Select a group, or deselect it when it is already active
    pub fn toggle_group(&mut self, index: usize) {
        if index >= self.player_groups.len() {
            log::warn!("Ignoring selection of unknown group {}", index + 1);
            return;
        }
        self.active_group = if self.active_group == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    /// Kill one unit of the active group, or any player unit when none is
    /// selected. Returns whether a unit was found.
    pub fn kill_one_unit(&mut self) -> bool {
        let victim = match self.active_group {
            Some(index) => self.player_groups.get_mut(index).and_then(|g| g.first_mut()),
            None => self.player_groups.iter_mut().flatten().next(),
        };
        match victim {
            Some(unit) => {
                unit.health = 0.0;
                log::debug!("Killed a player unit at {:?}", unit.pos);
                true
            }
            None => false,
        }
    }

    /// Apply one frame's worth of commands ahead of the tick
    pub fn apply_input(&mut self, input: &TickInput) {
        if let Some(index) = input.toggle_group {
            self.toggle_group(index);
        }
        if let Some(target) = input.move_target {
            self.issue_move_order(target);
        }
        if input.kill_unit {
            self.kill_one_unit();
        }
    }
}
