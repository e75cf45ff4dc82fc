//! Simulation tuning
//!
//! Every balance number lives here so a shell can load a JSON override.
//! Missing fields fall back to the defaults in [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or checking settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Base ===
    pub base_half_width: f32,
    pub base_half_height: f32,
    pub wall_thickness: f32,
    pub gate_width: f32,
    /// Walkability grid resolution
    pub cell_size: f32,

    // === Units ===
    pub unit_radius: f32,
    pub player_speed: f32,
    pub enemy_speed: f32,
    pub arrival_tolerance: f32,
    pub player_unit_count: usize,
    pub player_group_count: usize,

    // === Combat ===
    pub laser_range: f32,
    pub laser_damage: f32,
    /// Frames between shots
    pub laser_cooldown: u32,
    /// Frames a laser stays visible
    pub laser_effect_frames: u32,
    pub melee_range: f32,
    pub melee_damage: f32,

    // === Waves / respawn ===
    pub base_enemy_count: u32,
    /// Frames before a lost player unit is replaced
    pub respawn_delay: u32,
    pub respawn_margin: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            base_half_width: BASE_HALF_WIDTH,
            base_half_height: BASE_HALF_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            gate_width: GATE_WIDTH,
            cell_size: CELL_SIZE,

            unit_radius: UNIT_RADIUS,
            player_speed: PLAYER_SPEED,
            enemy_speed: ENEMY_SPEED,
            arrival_tolerance: ARRIVAL_TOLERANCE,
            player_unit_count: PLAYER_UNIT_COUNT,
            player_group_count: PLAYER_GROUP_COUNT,

            laser_range: LASER_RANGE,
            laser_damage: LASER_DAMAGE,
            laser_cooldown: LASER_COOLDOWN_FRAMES,
            laser_effect_frames: LASER_EFFECT_FRAMES,
            melee_range: MELEE_RANGE,
            melee_damage: MELEE_DAMAGE,

            base_enemy_count: BASE_ENEMY_COUNT,
            respawn_delay: RESPAWN_DELAY_FRAMES,
            respawn_margin: RESPAWN_MARGIN,
        }
    }
}

impl Settings {
    /// Parse settings from JSON (partial documents keep defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject parameter combinations the simulation cannot lay out
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(SettingsError::Invalid("arena must have a positive size".into()));
        }
        if self.cell_size <= 0.0 {
            return Err(SettingsError::Invalid("cell_size must be positive".into()));
        }
        if self.gate_width <= 0.0 || self.gate_width >= 2.0 * self.base_half_width {
            return Err(SettingsError::Invalid(format!(
                "gate_width {} must be in (0, {})",
                self.gate_width,
                2.0 * self.base_half_width
            )));
        }
        let interior = self.respawn_interior_half_extents();
        if interior.x < 0.0 || interior.y < 0.0 {
            return Err(SettingsError::Invalid(
                "base interior is smaller than the respawn margin".into(),
            ));
        }
        if self.player_group_count == 0 {
            return Err(SettingsError::Invalid("player_group_count must be at least 1".into()));
        }
        if self.player_speed <= 0.0 || self.enemy_speed <= 0.0 {
            return Err(SettingsError::Invalid("unit speeds must be positive".into()));
        }
        Ok(())
    }

    /// Arena size as a vector
    pub fn arena_size(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Base center (middle of the arena)
    pub fn base_center(&self) -> Vec2 {
        self.arena_size() / 2.0
    }

    /// Half extents of the area inside the walls where units may respawn
    pub fn respawn_interior_half_extents(&self) -> Vec2 {
        Vec2::new(
            self.base_half_width - self.wall_thickness - self.respawn_margin,
            self.base_half_height - self.wall_thickness - self.respawn_margin,
        )
    }
}
