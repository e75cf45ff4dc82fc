//! Browser binding
//!
//! The page shell owns the canvas and the frame loop; it forwards clicks and
//! keys here and draws from the JSON snapshot.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{GameState, tick};
use crate::ui::hud_lines;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("Mini Battles (web) starting...");
}

/// One running game
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
}

#[wasm_bindgen]
impl WebGame {
    /// New game seeded from the clock; bad settings JSON falls back to defaults
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> WebGame {
        let seed = js_sys::Date::now() as u64;
        let state = match settings_json.as_deref() {
            Some(json) => {
                Settings::from_json(json).and_then(|s| GameState::with_settings(seed, s))
            }
            None => Ok(GameState::new(seed)),
        };
        let state = state.unwrap_or_else(|e| {
            log::warn!("Invalid settings, using defaults: {}", e);
            GameState::new(seed)
        });
        WebGame { state }
    }

    pub fn tick(&mut self) {
        tick(&mut self.state);
    }

    /// Right-click destination in canvas pixels
    pub fn issue_move_order(&mut self, x: f32, y: f32) {
        self.state.issue_move_order(Vec2::new(x, y));
    }

    /// Number key `n` selects group `n - 1`
    pub fn toggle_group(&mut self, index: usize) {
        self.state.toggle_group(index);
    }

    pub fn kill_one_unit(&mut self) -> bool {
        self.state.kill_one_unit()
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.state
            .snapshot()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn hud(&self) -> Vec<String> {
        hud_lines(&self.state)
    }
}
