//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`]; the render shell only
//! ever reads it.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::base::Base;
use super::pathfinder::Pathfinder;
use crate::consts::{PLAYER_SPACING, UNIT_MAX_HEALTH};
use crate::settings::{Settings, SettingsError};

/// Which side a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// Command-driven (blue)
    Player,
    /// Wandering (red)
    Enemy,
}

/// A mobile, combat-capable actor
#[derive(Debug, Clone, Serialize)]
pub struct Unit {
    pub pos: Vec2,
    pub health: f32,
    pub team: Team,
    pub radius: f32,
    /// Distance covered per tick
    pub speed: f32,
    /// Immediate waypoint
    pub target: Option<Vec2>,
    /// Queued waypoints, consumed front to back
    pub waypoints: VecDeque<Vec2>,
    /// Frames until the next laser shot (player only)
    pub laser_cooldown: u32,
    /// Snap distance when arriving at a waypoint
    #[serde(skip)]
    arrival_tolerance: f32,
}

impl Unit {
    pub fn new(pos: Vec2, team: Team, settings: &Settings) -> Self {
        let speed = match team {
            Team::Player => settings.player_speed,
            Team::Enemy => settings.enemy_speed,
        };
        Self {
            pos,
            health: UNIT_MAX_HEALTH,
            team,
            radius: settings.unit_radius,
            speed,
            target: None,
            waypoints: VecDeque::new(),
            laser_cooldown: 0,
            arrival_tolerance: settings.arrival_tolerance,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Drop any queued path and head straight for `point`
    pub fn set_target(&mut self, point: Vec2) {
        self.waypoints.clear();
        self.target = Some(point);
    }

    /// Replace the queue with `waypoints`; the first one becomes the target now
    pub fn set_path(&mut self, waypoints: &[Vec2]) {
        self.waypoints = waypoints.iter().copied().collect();
        self.target = self.waypoints.pop_front();
    }

    /// Whether the unit has nowhere to go
    pub fn is_idle(&self) -> bool {
        self.target.is_none() && self.waypoints.is_empty()
    }

    /// Per-tick movement and timers
    ///
    /// Arrival snaps onto the waypoint and clears it; the next queued one is
    /// picked up on the following tick. Idle enemies pick a new wander target
    /// in the upper half of `arena`.
    pub fn advance<R: Rng>(&mut self, arena: Vec2, rng: &mut R) {
        if self.target.is_none() {
            self.target = self.waypoints.pop_front();
        }

        if let Some(target) = self.target {
            let to_target = target - self.pos;
            let distance = to_target.length();
            if distance < self.speed || distance < self.arrival_tolerance {
                self.pos = target;
                self.target = None;
            } else {
                self.pos += to_target / distance * self.speed;
            }
        }

        match self.team {
            Team::Enemy => {
                if self.is_idle() {
                    self.target = Some(Vec2::new(
                        rng.random_range(0.0..arena.x),
                        rng.random_range(0.0..arena.y / 2.0),
                    ));
                }
            }
            Team::Player => {
                self.laser_cooldown = self.laser_cooldown.saturating_sub(1);
            }
        }
    }
}

/// A laser beam drawn for a few frames after a shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaserEffect {
    pub start: Vec2,
    pub end: Vec2,
    pub frames_remaining: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Tuning in effect for this session
    pub settings: Settings,
    /// Wall layout
    pub base: Base,
    /// Path planner over the base walls
    pub pathfinder: Pathfinder,
    /// Player units by command group
    pub player_groups: Vec<Vec<Unit>>,
    /// Size each player group was spawned with
    pub group_sizes: Vec<usize>,
    /// Current enemy wave roster
    pub enemies: Vec<Unit>,
    /// Active laser beams (visual only)
    pub lasers: Vec<LaserEffect>,
    /// Group receiving move orders (None = all groups)
    pub active_group: Option<usize>,
    /// Current enemy wave (starts at 1)
    pub enemy_wave: u32,
    /// Frames until the next respawn, when one is pending
    pub respawn_timer: Option<u32>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Settings::default())
    }

    /// Create a new game with the given tuning, rejecting values the
    /// simulation cannot lay out
    pub fn with_settings(seed: u64, settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::build(seed, settings))
    }

    fn build(seed: u64, settings: Settings) -> Self {
        let base = Base::from_settings(&settings);
        let pathfinder = Pathfinder::from_settings(&base, &settings);

        let mut state = Self {
            seed,
            base,
            pathfinder,
            player_groups: Vec::new(),
            group_sizes: Vec::new(),
            enemies: Vec::new(),
            lasers: Vec::new(),
            active_group: None,
            enemy_wave: 1,
            respawn_timer: None,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            settings,
        };

        state.spawn_player_groups();
        state.spawn_enemy_wave();
        log::info!(
            "Game started (seed {}): {} player units in {} groups, {} enemies",
            seed,
            state.player_unit_count(),
            state.player_groups.len(),
            state.enemies.len()
        );

        state
    }

    /// Place the player row across the base center and split it into groups
    fn spawn_player_groups(&mut self) {
        let count = self.settings.player_unit_count;
        let groups = self.settings.player_group_count.max(1);
        let per_group = count.div_ceil(groups).max(1);
        let center = self.base.center;

        self.player_groups = vec![Vec::new(); groups];
        for i in 0..count {
            let offset = (i as f32 - (count as f32 - 1.0) / 2.0) * PLAYER_SPACING;
            let unit = Unit::new(
                Vec2::new(center.x + offset, center.y),
                Team::Player,
                &self.settings,
            );
            let group = (i / per_group).min(groups - 1);
            self.player_groups[group].push(unit);
        }
        self.group_sizes = self.player_groups.iter().map(Vec::len).collect();
    }

    /// Add `base_enemy_count + enemy_wave` enemies in the upper band
    pub fn spawn_enemy_wave(&mut self) {
        let count = self.settings.base_enemy_count + self.enemy_wave;
        let mid_x = self.settings.arena_width / 2.0;
        for _ in 0..count {
            let pos = Vec2::new(
                mid_x + self.rng.random_range(-100.0f32..100.0),
                50.0 + self.rng.random_range(0.0f32..50.0),
            );
            self.enemies.push(Unit::new(pos, Team::Enemy, &self.settings));
        }
        log::info!("Wave {}: spawned {} enemies", self.enemy_wave, count);
    }

    /// Random point inside the base, clear of the walls by the respawn margin
    pub fn random_base_interior_point(&mut self) -> Vec2 {
        let half = self.settings.respawn_interior_half_extents();
        let center = self.base.center;
        Vec2::new(
            center.x + self.rng.random_range(-half.x..=half.x),
            center.y + self.rng.random_range(-half.y..=half.y),
        )
    }

    /// All player units across groups
    pub fn player_units(&self) -> impl Iterator<Item = &Unit> {
        self.player_groups.iter().flatten()
    }

    pub fn player_unit_count(&self) -> usize {
        self.player_groups.iter().map(Vec::len).sum()
    }

    /// Whether any group is below its spawn size
    pub fn has_group_deficit(&self) -> bool {
        self.player_groups
            .iter()
            .zip(&self.group_sizes)
            .any(|(group, &size)| group.len() < size)
    }
}
