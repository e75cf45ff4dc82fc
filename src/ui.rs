//! HUD text labels
//!
//! Read-only: the overlay never touches the simulation.

use crate::consts::FRAMES_PER_SECOND;
use crate::sim::GameState;

/// Key hint shown for the debug kill command
pub const KILL_HINT: &str = "Press D to kill a player unit (dev)";

/// "1", "2", ... for a selected group, "All" otherwise
pub fn active_group_label(state: &GameState) -> String {
    match state.active_group {
        Some(index) => (index + 1).to_string(),
        None => "All".to_string(),
    }
}

/// Seconds left on a frame countdown, one decimal place
pub fn format_countdown(frames: u32) -> String {
    format!("{:.1}s", frames as f32 / FRAMES_PER_SECOND as f32)
}

/// Overlay lines, top to bottom
pub fn hud_lines(state: &GameState) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Press 1 or 2 to toggle unit group. Active Group: {}",
            active_group_label(state)
        ),
        format!("Wave: {}", state.enemy_wave),
    ];
    if let Some(frames) = state.respawn_timer {
        lines.push(format!("Respawn in: {}", format_countdown(frames)));
    }
    lines.push(KILL_HINT.to_string());
    lines
}
