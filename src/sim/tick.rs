//! Fixed-order simulation tick
//!
//! One call advances the game by one frame. Phases run in a fixed order and
//! each one sees the unit positions and health left by the previous phase.

use super::collision::{circle_rect_collision, line_of_sight_blocked, resolve_circle_pair};
use super::state::{GameState, LaserEffect, Team, Unit};

/// Advance the game state by one frame
pub fn tick(state: &mut GameState) {
    state.time_ticks += 1;

    move_units(state);
    resolve_unit_collisions(state);
    let fired = fire_lasers(state);
    age_lasers(state, fired);
    contain_units(state);
    resolve_melee(state);
    remove_dead(state);
    update_respawn(state);
    spawn_wave_if_cleared(state);
}

/// Player groups first, then the enemy roster
pub(crate) fn move_units(state: &mut GameState) {
    let arena = state.settings.arena_size();
    for unit in state.player_groups.iter_mut().flatten() {
        unit.advance(arena, &mut state.rng);
    }
    for unit in state.enemies.iter_mut() {
        unit.advance(arena, &mut state.rng);
    }
}

/// Single pass over every unit pair; residual overlap between three or more
/// mutually touching units is left for later ticks.
pub(crate) fn resolve_unit_collisions(state: &mut GameState) {
    let mut units: Vec<&mut Unit> = state
        .player_groups
        .iter_mut()
        .flatten()
        .chain(state.enemies.iter_mut())
        .collect();

    for i in 0..units.len() {
        let (head, tail) = units.split_at_mut(i + 1);
        let a = &mut *head[i];
        for b in tail.iter_mut() {
            let (ra, rb) = (a.radius, b.radius);
            resolve_circle_pair(&mut a.pos, ra, &mut b.pos, rb, &mut state.rng);
        }
    }
}

/// Each ready player unit shoots the first enemy (roster order) in range with
/// a clear line past the walls. Returns the beams fired this tick.
pub(crate) fn fire_lasers(state: &mut GameState) -> Vec<LaserEffect> {
    let settings = &state.settings;
    let walls = state.base.walls();
    let mut fired = Vec::new();

    for shooter in state.player_groups.iter_mut().flatten() {
        if shooter.laser_cooldown > 0 {
            continue;
        }
        let victim = state.enemies.iter_mut().find(|enemy| {
            shooter.pos.distance(enemy.pos) <= settings.laser_range
                && !line_of_sight_blocked(shooter.pos, enemy.pos, walls)
        });
        if let Some(enemy) = victim {
            enemy.health -= settings.laser_damage;
            shooter.laser_cooldown = settings.laser_cooldown;
            fired.push(LaserEffect {
                start: shooter.pos,
                end: enemy.pos,
                frames_remaining: settings.laser_effect_frames,
            });
        }
    }

    fired
}

/// Age existing beams, drop expired ones, then add this tick's shots
pub(crate) fn age_lasers(state: &mut GameState, fired: Vec<LaserEffect>) {
    state.lasers.retain_mut(|laser| {
        laser.frames_remaining = laser.frames_remaining.saturating_sub(1);
        laser.frames_remaining > 0
    });
    state.lasers.extend(fired);
}

/// Push every unit out of any wall it penetrates
pub(crate) fn contain_units(state: &mut GameState) {
    let walls = state.base.walls();
    for unit in state
        .player_groups
        .iter_mut()
        .flatten()
        .chain(state.enemies.iter_mut())
    {
        for wall in walls {
            let hit = circle_rect_collision(unit.pos, unit.radius, wall);
            if hit.hit {
                unit.pos += hit.normal * hit.penetration;
            }
        }
    }
}

/// Mutual close-range damage, independent of any laser hit this tick
pub(crate) fn resolve_melee(state: &mut GameState) {
    let range = state.settings.melee_range;
    let damage = state.settings.melee_damage;
    for player in state.player_groups.iter_mut().flatten() {
        for enemy in state.enemies.iter_mut() {
            if player.pos.distance(enemy.pos) < range {
                player.health -= damage;
                enemy.health -= damage;
            }
        }
    }
}

pub(crate) fn remove_dead(state: &mut GameState) {
    let before = state.player_unit_count() + state.enemies.len();
    for group in state.player_groups.iter_mut() {
        group.retain(Unit::is_alive);
    }
    state.enemies.retain(Unit::is_alive);

    let removed = before - (state.player_unit_count() + state.enemies.len());
    if removed > 0 {
        log::debug!("Tick {}: removed {} dead units", state.time_ticks, removed);
    }
}

/// One countdown shared by all groups; when it fires every under-strength
/// group gets exactly one replacement.
pub(crate) fn update_respawn(state: &mut GameState) {
    if !state.has_group_deficit() {
        state.respawn_timer = None;
        return;
    }

    let remaining = state
        .respawn_timer
        .unwrap_or(state.settings.respawn_delay)
        .saturating_sub(1);
    if remaining > 0 {
        state.respawn_timer = Some(remaining);
        return;
    }

    state.respawn_timer = None;
    for index in 0..state.player_groups.len() {
        if state.player_groups[index].len() >= state.group_sizes[index] {
            continue;
        }
        let pos = state.random_base_interior_point();
        let unit = Unit::new(pos, Team::Player, &state.settings);
        state.player_groups[index].push(unit);
        log::debug!("Respawned a unit in group {} at {:?}", index + 1, pos);
    }
}

pub(crate) fn spawn_wave_if_cleared(state: &mut GameState) {
    if state.enemies.is_empty() {
        state.enemy_wave += 1;
        state.spawn_enemy_wave();
    }
}
