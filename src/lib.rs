//! Mini Battles - a small real-time-strategy skirmish
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, pathfinding, combat, waves)
//! - `settings`: Data-driven tuning for the simulation
//! - `snapshot`: Read-only view of the game handed to the render shell
//! - `ui`: HUD text labels
//! - `web`: Browser binding (wasm32 only)

pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod ui;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{Settings, SettingsError};
pub use snapshot::Snapshot;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target frame rate; all timers are counted in frames at this rate
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Arena dimensions (pixels)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Base (obstacle map) defaults, centered in the arena
    pub const BASE_HALF_WIDTH: f32 = 100.0;
    pub const BASE_HALF_HEIGHT: f32 = 75.0;
    pub const WALL_THICKNESS: f32 = 10.0;
    pub const GATE_WIDTH: f32 = 40.0;

    /// Walkability grid resolution (pixels per cell)
    pub const CELL_SIZE: f32 = 10.0;

    /// Unit defaults
    pub const UNIT_RADIUS: f32 = 10.0;
    pub const UNIT_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_SPEED: f32 = 2.0;
    pub const ENEMY_SPEED: f32 = 1.5;
    /// Snap distance for waypoints (grid-derived points are not exact)
    pub const ARRIVAL_TOLERANCE: f32 = 1.0;

    /// Ranged combat (player only)
    pub const LASER_RANGE: f32 = 150.0;
    pub const LASER_DAMAGE: f32 = 10.0;
    pub const LASER_COOLDOWN_FRAMES: u32 = 60;
    pub const LASER_EFFECT_FRAMES: u32 = 10;

    /// Melee combat (mutual, every tick)
    pub const MELEE_RANGE: f32 = 20.0;
    pub const MELEE_DAMAGE: f32 = 0.5;

    /// Respawn countdown (3 seconds)
    pub const RESPAWN_DELAY_FRAMES: u32 = 3 * FRAMES_PER_SECOND;
    /// Distance kept from the inner wall faces when respawning
    pub const RESPAWN_MARGIN: f32 = 20.0;

    /// Wave N spawns BASE_ENEMY_COUNT + N enemies
    pub const BASE_ENEMY_COUNT: u32 = 4;

    /// Player roster
    pub const PLAYER_UNIT_COUNT: usize = 5;
    pub const PLAYER_GROUP_COUNT: usize = 2;
    /// Horizontal spacing of the initial player row
    pub const PLAYER_SPACING: f32 = 30.0;

    /// Minimum radius of a formation circle
    pub const MIN_FORMATION_RADIUS: f32 = 40.0;
    /// Formation radius per unit in the group
    pub const FORMATION_RADIUS_PER_UNIT: f32 = 10.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
