//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed and the same sequence
//! of commands, every run produces the same state:
//! - Fixed timestep (one tick per frame)
//! - Seeded RNG only
//! - Stable iteration order (group order, then roster order)
//! - No rendering or platform dependencies

pub mod base;
pub mod collision;
pub mod orders;
pub mod pathfinder;
pub mod rect;
pub mod state;
pub mod tick;

pub use base::Base;
pub use collision::{CollisionResult, circle_rect_collision, line_of_sight_blocked};
pub use orders::{TickInput, formation_slots};
pub use pathfinder::{Pathfinder, WalkGrid};
pub use rect::Rect;
pub use state::{GameState, LaserEffect, Team, Unit};
pub use tick::tick;
